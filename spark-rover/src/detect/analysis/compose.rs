use crate::control::command::MotionCommand;
use crate::detect::analysis::decision::{Decision, DecisionContext, DisplayState};
use crate::detect::analysis::{DecisionRule, RuleDispatcher};
use crate::detect::property::frame_readings::FrameReadings;
use log::debug;

/// The priority decision table: obstacle, then stop sign, then line following,
/// then the no-line stop. Exactly one decision per cycle.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    rules: Vec<RuleDispatcher>,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionEngine {
    pub fn new() -> Self {
        DecisionEngine {
            rules: RuleDispatcher::all(),
        }
    }

    pub fn decide(&self, readings: &FrameReadings, context: &DecisionContext) -> Decision {
        for rule in &self.rules {
            if let Some(decision) = rule.decide(readings, context) {
                debug!("Rule {} fired: {}", rule.name(), decision.command);
                return decision;
            }
        }

        // The no-line rule always fires; kept for completeness of the table.
        Decision::new(MotionCommand::stop(), DisplayState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::command::CommandKind;
    use crate::detect::analysis::decision::{AlertKind, MotorState};
    use crate::detect::property::line::{LineReading, SteeringDirection};
    use crate::detect::property::obstacle::ObstacleReading;
    use crate::detect::property::sign::{SignReading, TrafficSign};
    use std::time::Duration;

    fn readings(line: LineReading, sign: Option<TrafficSign>, obstacle: Option<u32>) -> FrameReadings {
        FrameReadings {
            line,
            sign: SignReading {
                sign,
                confidence: 0,
            },
            obstacle: match obstacle {
                Some(distance) => ObstacleReading {
                    detected: true,
                    distance,
                    edge_count: 0,
                },
                None => ObstacleReading::default(),
            },
        }
    }

    fn line(direction: SteeringDirection, deviation: f64) -> LineReading {
        LineReading {
            direction,
            deviation,
            detected: true,
        }
    }

    #[test]
    fn close_obstacle_preempts_everything() {
        let engine = DecisionEngine::new();
        let decision = engine.decide(
            &readings(line(SteeringDirection::Left, 10.0), Some(TrafficSign::Stop), Some(15)),
            &DecisionContext::default(),
        );

        assert_eq!(decision.command, MotionCommand::stop());
        assert_eq!(decision.alert.as_ref().map(|a| a.kind), Some(AlertKind::Obstacle));
        assert_eq!(decision.alert.map(|a| a.message), Some("Obstacle at 15cm".to_string()));
        assert_eq!(decision.resume, None);
        assert_eq!(decision.display.motor, MotorState::Stopped);
    }

    #[test]
    fn obstacle_at_safe_distance_does_not_stop() {
        let engine = DecisionEngine::new();
        let decision = engine.decide(
            &readings(line(SteeringDirection::Center, 0.0), None, Some(20)),
            &DecisionContext::default(),
        );
        assert_eq!(decision.command, MotionCommand::forward(50));
        assert_eq!(decision.display.obstacle_distance, Some(Some(20)));
    }

    #[test]
    fn stop_sign_stops_and_plans_resume() {
        let engine = DecisionEngine::new();
        let context = DecisionContext {
            stop_duration: Duration::from_millis(1500),
            ..Default::default()
        };
        let decision = engine.decide(
            &readings(line(SteeringDirection::Right, 5.0), Some(TrafficSign::Stop), None),
            &context,
        );

        assert_eq!(decision.command, MotionCommand::stop());
        assert_eq!(decision.alert.map(|a| a.kind), Some(AlertKind::StopSign));
        let resume = decision.resume.expect("resume planned");
        assert_eq!(resume.after, Duration::from_millis(1500));
        assert_eq!(resume.command, MotionCommand::forward(50));
    }

    #[test]
    fn green_light_does_not_interrupt_line_following() {
        let engine = DecisionEngine::new();
        let decision = engine.decide(
            &readings(line(SteeringDirection::Left, 12.4), Some(TrafficSign::GreenLight), None),
            &DecisionContext::default(),
        );
        assert_eq!(decision.command, MotionCommand::new(CommandKind::Left, 38));
        assert_eq!(decision.display.direction, Some(SteeringDirection::Left));
        assert_eq!(decision.display.speed, Some(50));
        assert_eq!(decision.display.obstacle_distance, Some(None));
    }

    #[test]
    fn no_line_stops() {
        let engine = DecisionEngine::new();
        let decision = engine.decide(&FrameReadings::default(), &DecisionContext::default());
        assert_eq!(decision.command, MotionCommand::stop());
        assert_eq!(decision.alert, None);
        assert_eq!(decision.display.motor, MotorState::Idle);
    }

    #[test]
    fn rules_are_registered_in_priority_order() {
        let names = RuleDispatcher::all().iter().map(|r| r.name()).collect::<Vec<_>>();
        assert_eq!(names, vec!["obstacle", "stop_sign", "line_follow", "no_line"]);
    }
}
