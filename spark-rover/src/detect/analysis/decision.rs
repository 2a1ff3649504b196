use crate::control::command::MotionCommand;
use crate::detect::property::line::SteeringDirection;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Tunables the rules read. Copied out of the session for every cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionContext {
    /// Obstacles strictly closer than this (cm) stop the vehicle.
    pub safe_distance: u32,
    /// Base autonomous speed.
    pub cruise_speed: u8,
    pub stop_duration: Duration,
}

impl Default for DecisionContext {
    fn default() -> Self {
        DecisionContext {
            safe_distance: 20,
            cruise_speed: 50,
            stop_duration: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Obstacle,
    StopSign,
}

impl Display for AlertKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::Obstacle => write!(f, "obstacle"),
            AlertKind::StopSign => write!(f, "stop"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MotorState {
    Running,
    Stopped,
    #[default]
    Idle,
}

impl Display for MotorState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MotorState::Running => write!(f, "running"),
            MotorState::Stopped => write!(f, "stopped"),
            MotorState::Idle => write!(f, "idle"),
        }
    }
}

/// Side-channel visual state for whatever UI is attached. `None` leaves the field as is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DisplayState {
    pub direction: Option<SteeringDirection>,
    pub motor: MotorState,
    pub speed: Option<u8>,
    /// `Some(None)` clears the reading ("--"), `None` leaves it untouched.
    pub obstacle_distance: Option<Option<u32>>,
}

/// Deferred command issued after a stop-sign pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumePlan {
    pub after: Duration,
    pub command: MotionCommand,
}

/// Outcome of one decision cycle. Pure data; applying it is the session's job.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub command: MotionCommand,
    pub alert: Option<Alert>,
    pub display: DisplayState,
    pub resume: Option<ResumePlan>,
}

impl Decision {
    pub fn new(command: MotionCommand, display: DisplayState) -> Self {
        Decision {
            command,
            alert: None,
            display,
            resume: None,
        }
    }

    pub fn with_alert(mut self, kind: AlertKind, message: impl Into<String>) -> Self {
        self.alert = Some(Alert {
            kind,
            message: message.into(),
        });
        self
    }

    pub fn with_resume(mut self, resume: ResumePlan) -> Self {
        self.resume = Some(resume);
        self
    }
}
