use crate::control::command::MotionCommand;
use crate::detect::analysis::decision::{
    AlertKind, Decision, DecisionContext, DisplayState, MotorState, ResumePlan,
};
use crate::detect::analysis::DecisionRule;
use crate::detect::property::frame_readings::FrameReadings;
use crate::detect::property::sign::TrafficSign;

#[derive(Debug, Copy, Clone)]
pub struct StopSignRule;

impl DecisionRule for StopSignRule {
    fn name(&self) -> &'static str {
        "stop_sign"
    }

    fn decide(&self, readings: &FrameReadings, context: &DecisionContext) -> Option<Decision> {
        if readings.sign.sign != Some(TrafficSign::Stop) {
            return None;
        }

        let display = DisplayState {
            motor: MotorState::Stopped,
            ..Default::default()
        };
        Some(
            Decision::new(MotionCommand::stop(), display)
                .with_alert(AlertKind::StopSign, "STOP sign detected")
                .with_resume(ResumePlan {
                    after: context.stop_duration,
                    command: MotionCommand::forward(context.cruise_speed),
                }),
        )
    }
}
