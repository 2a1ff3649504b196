pub mod compose;
pub mod decision;
mod line_follow_rule;
mod no_line_rule;
mod obstacle_rule;
mod stop_sign_rule;
#[macro_use]
mod dispatch_macro;

use crate::detect::analysis::decision::{Decision, DecisionContext};
use crate::detect::analysis::line_follow_rule::LineFollowRule;
use crate::detect::analysis::no_line_rule::NoLineRule;
use crate::detect::analysis::obstacle_rule::ObstacleRule;
use crate::detect::analysis::stop_sign_rule::StopSignRule;
use crate::detect::property::frame_readings::FrameReadings;

/// One row of the priority decision table.
pub trait DecisionRule {
    fn name(&self) -> &'static str;

    /// Returns `Some` when the rule fires; later rules are then skipped for the cycle.
    fn decide(&self, readings: &FrameReadings, context: &DecisionContext) -> Option<Decision>;
}

define_rules![
    Obstacle => ObstacleRule,
    StopSign => StopSignRule,
    LineFollow => LineFollowRule,
    NoLine => NoLineRule,
];
