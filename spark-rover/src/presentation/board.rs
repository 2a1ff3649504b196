use crate::detect::analysis::decision::{AlertKind, DisplayState, MotorState};
use crate::detect::overlay::Overlay;
use crate::detect::property::line::SteeringDirection;
use crate::presentation::{Severity, StatusKey, StatusSink, StatusState};
use crate::session::context::SessionSettings;
use hashbrown::HashMap;
use log::{error, info, warn};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

pub(crate) const LOG_CAPACITY: usize = 50;
const JOURNAL_TARGET: &str = "spark_rover::journal";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub text: String,
    pub state: StatusState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Milliseconds since the board was created.
    pub elapsed_ms: u64,
    pub severity: Severity,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveAlert {
    pub message: String,
    pub since_ms: u64,
}

/// What the dashboard panel shows: direction glyph, motor glyph, speed, obstacle distance.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Panel {
    pub direction: Option<SteeringDirection>,
    pub motor: MotorState,
    pub speed: Option<u8>,
    /// `None` renders as "--".
    pub obstacle_distance: Option<u32>,
}

impl Panel {
    fn apply(&mut self, display: &DisplayState) {
        if let Some(direction) = display.direction {
            self.direction = Some(direction);
        }
        self.motor = display.motor;
        if let Some(speed) = display.speed {
            self.speed = Some(speed);
        }
        if let Some(distance) = display.obstacle_distance {
            self.obstacle_distance = distance;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StatusSnapshot {
    pub statuses: HashMap<StatusKey, StatusEntry>,
    /// Newest first.
    pub log: Vec<LogEntry>,
    pub alerts: HashMap<AlertKind, ActiveAlert>,
    pub panel: Panel,
    pub overlay: Option<Overlay>,
    pub command_count: u64,
    pub settings: Option<SessionSettings>,
}

#[derive(Debug)]
struct BoardInner {
    started: Instant,
    statuses: HashMap<StatusKey, StatusEntry>,
    log: VecDeque<LogEntry>,
    alerts: HashMap<AlertKind, ActiveAlert>,
    panel: Panel,
    overlay: Option<Overlay>,
    command_count: u64,
    settings: Option<SessionSettings>,
}

impl BoardInner {
    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn push_log(&mut self, text: &str, severity: Severity) {
        let entry = LogEntry {
            elapsed_ms: self.elapsed_ms(),
            severity,
            text: text.to_string(),
        };
        self.log.push_front(entry);
        self.log.truncate(LOG_CAPACITY);
    }
}

/// Shared in-memory status board. Cloning shares the same state.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    inner: Arc<RwLock<BoardInner>>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        let mut statuses = HashMap::new();
        for (key, text) in [
            (StatusKey::Camera, "Camera: inactive"),
            (StatusKey::Link, "Link: disconnected"),
            (StatusKey::Detection, "Detection: inactive"),
        ] {
            statuses.insert(
                key,
                StatusEntry {
                    text: text.to_string(),
                    state: StatusState::Disconnected,
                },
            );
        }

        StatusBoard {
            inner: Arc::new(RwLock::new(BoardInner {
                started: Instant::now(),
                statuses,
                log: VecDeque::with_capacity(LOG_CAPACITY),
                alerts: HashMap::new(),
                panel: Panel::default(),
                overlay: None,
                command_count: 0,
                settings: None,
            })),
        }
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let inner = self.inner.read();
        StatusSnapshot {
            statuses: inner.statuses.clone(),
            log: inner.log.iter().cloned().collect(),
            alerts: inner.alerts.clone(),
            panel: inner.panel,
            overlay: inner.overlay.clone(),
            command_count: inner.command_count,
            settings: inner.settings.clone(),
        }
    }
}

impl StatusSink for StatusBoard {
    fn set_status(&self, key: StatusKey, text: &str, state: StatusState) {
        self.inner.write().statuses.insert(
            key,
            StatusEntry {
                text: text.to_string(),
                state,
            },
        );
    }

    fn append_log(&self, text: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => info!(target: JOURNAL_TARGET, "{}", text),
            Severity::Warning => warn!(target: JOURNAL_TARGET, "{}", text),
            Severity::Error => error!(target: JOURNAL_TARGET, "{}", text),
        }
        self.inner.write().push_log(text, severity);
    }

    fn set_alert(&self, kind: AlertKind, message: &str, active: bool) {
        let mut inner = self.inner.write();
        if !active {
            inner.alerts.remove(&kind);
            return;
        }
        if inner.alerts.contains_key(&kind) {
            return;
        }
        let since_ms = inner.elapsed_ms();
        inner.alerts.insert(
            kind,
            ActiveAlert {
                message: message.to_string(),
                since_ms,
            },
        );
    }

    fn clear_alerts(&self) {
        self.inner.write().alerts.clear();
    }

    fn set_overlay(&self, overlay: Overlay) {
        self.inner.write().overlay = Some(overlay);
    }

    fn set_display(&self, display: &DisplayState) {
        self.inner.write().panel.apply(display);
    }

    fn set_command_count(&self, count: u64) {
        self.inner.write().command_count = count;
    }

    fn set_settings(&self, settings: &SessionSettings) {
        self.inner.write().settings = Some(settings.clone());
    }

    fn clear_log(&self) {
        let mut inner = self.inner.write();
        inner.log.clear();
        inner.push_log("Log cleared", Severity::Info);
    }
}
