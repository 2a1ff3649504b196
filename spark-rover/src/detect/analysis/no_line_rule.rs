use crate::control::command::MotionCommand;
use crate::detect::analysis::decision::{Decision, DecisionContext, DisplayState, MotorState};
use crate::detect::analysis::DecisionRule;
use crate::detect::property::frame_readings::FrameReadings;

/// Fallback when nothing else fired: no line means no motion.
#[derive(Debug, Copy, Clone)]
pub struct NoLineRule;

impl DecisionRule for NoLineRule {
    fn name(&self) -> &'static str {
        "no_line"
    }

    fn decide(&self, readings: &FrameReadings, _context: &DecisionContext) -> Option<Decision> {
        let display = DisplayState {
            motor: MotorState::Idle,
            obstacle_distance: Some(readings.obstacle.detected.then_some(readings.obstacle.distance)),
            ..Default::default()
        };
        Some(Decision::new(MotionCommand::stop(), display))
    }
}
