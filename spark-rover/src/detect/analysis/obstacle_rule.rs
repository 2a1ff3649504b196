use crate::control::command::MotionCommand;
use crate::detect::analysis::decision::{AlertKind, Decision, DecisionContext, DisplayState, MotorState};
use crate::detect::analysis::DecisionRule;
use crate::detect::property::frame_readings::FrameReadings;

#[derive(Debug, Copy, Clone)]
pub struct ObstacleRule;

impl DecisionRule for ObstacleRule {
    fn name(&self) -> &'static str {
        "obstacle"
    }

    fn decide(&self, readings: &FrameReadings, context: &DecisionContext) -> Option<Decision> {
        let obstacle = &readings.obstacle;
        if !obstacle.detected || obstacle.distance >= context.safe_distance {
            return None;
        }

        let display = DisplayState {
            motor: MotorState::Stopped,
            ..Default::default()
        };
        Some(
            Decision::new(MotionCommand::stop(), display)
                .with_alert(AlertKind::Obstacle, format!("Obstacle at {}cm", obstacle.distance)),
        )
    }
}
