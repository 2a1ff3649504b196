use anyhow::{anyhow, bail, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const MAX_MAGNITUDE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandKind {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
}

impl CommandKind {
    pub const ALL: [CommandKind; 5] = [
        CommandKind::Forward,
        CommandKind::Backward,
        CommandKind::Left,
        CommandKind::Right,
        CommandKind::Stop,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            CommandKind::Forward => "FORWARD",
            CommandKind::Backward => "BACKWARD",
            CommandKind::Left => "LEFT",
            CommandKind::Right => "RIGHT",
            CommandKind::Stop => "STOP",
        }
    }
}

impl Display for CommandKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

impl FromStr for CommandKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.wire_name() == wanted)
            .ok_or_else(|| anyhow!("Unknown command: {}", s))
    }
}

/// One motion order for the motor controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MotionCommand {
    pub kind: CommandKind,
    /// 0..=100, always 0 for STOP.
    pub magnitude: u8,
}

impl MotionCommand {
    pub fn new(kind: CommandKind, magnitude: u8) -> Self {
        let magnitude = match kind {
            CommandKind::Stop => 0,
            _ => magnitude.min(MAX_MAGNITUDE),
        };
        MotionCommand { kind, magnitude }
    }

    pub fn stop() -> Self {
        Self::new(CommandKind::Stop, 0)
    }

    pub fn forward(speed: u8) -> Self {
        Self::new(CommandKind::Forward, speed)
    }

    /// `base - deviation`, rounded and clamped into 0..=100.
    pub fn steer(kind: CommandKind, base: u8, deviation: f64) -> Self {
        let speed = (base as f64 - deviation).round().clamp(0.0, MAX_MAGNITUDE as f64);
        Self::new(kind, speed as u8)
    }

    /// ASCII `KIND:magnitude`, no framing, no escaping.
    pub fn encode(&self) -> Bytes {
        Bytes::from(self.to_string())
    }

    pub fn parse(text: &str) -> Result<Self> {
        let (kind, value) = text
            .trim()
            .split_once(':')
            .ok_or_else(|| anyhow!("Missing ':' in command {:?}", text))?;
        let kind = kind.parse::<CommandKind>()?;
        let value = value
            .parse::<u8>()
            .map_err(|e| anyhow!("Bad magnitude in {:?}: {}", text, e))?;
        if value > MAX_MAGNITUDE {
            bail!("Magnitude {} out of range in {:?}", value, text);
        }
        Ok(MotionCommand::new(kind, value))
    }
}

impl Display for MotionCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.magnitude)
    }
}
