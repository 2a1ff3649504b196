use crate::control::command::{CommandKind, MotionCommand};
use crate::detect::analysis::decision::{Decision, DecisionContext, DisplayState, MotorState};
use crate::detect::analysis::DecisionRule;
use crate::detect::property::frame_readings::FrameReadings;
use crate::detect::property::line::SteeringDirection;

#[derive(Debug, Copy, Clone)]
pub struct LineFollowRule;

impl DecisionRule for LineFollowRule {
    fn name(&self) -> &'static str {
        "line_follow"
    }

    fn decide(&self, readings: &FrameReadings, context: &DecisionContext) -> Option<Decision> {
        let line = &readings.line;
        if !line.detected {
            return None;
        }

        let base = context.cruise_speed;
        let command = match line.direction {
            SteeringDirection::Left => MotionCommand::steer(CommandKind::Left, base, line.deviation),
            SteeringDirection::Right => MotionCommand::steer(CommandKind::Right, base, line.deviation),
            SteeringDirection::Center => MotionCommand::forward(base),
        };

        let display = DisplayState {
            direction: Some(line.direction),
            motor: MotorState::Running,
            // The panel shows the base speed, not the reduced turning speed.
            speed: Some(base),
            obstacle_distance: Some(readings.obstacle.detected.then_some(readings.obstacle.distance)),
        };
        Some(Decision::new(command, display))
    }
}
