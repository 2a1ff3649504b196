use crate::config::RoverConfig;
use crate::control::command::{CommandKind, MotionCommand};
use crate::control::dispatcher::{CommandDispatcher, DispatchError};
use crate::control::transport::{Connector, LinkTarget, LinkWatch, Transport};
use crate::detect::analysis::compose::DecisionEngine;
use crate::detect::analysis::decision::{AlertKind, Decision, ResumePlan};
use crate::detect::overlay::{annotate, Overlay};
use crate::detect::property::frame_readings::{analyze_frame, FrameReadings};
use crate::presentation::{Severity, StatusKey, StatusSink, StatusState};
use crate::session::context::SessionSettings;
use crate::session::{SessionEvent, SessionHandle, EVENT_QUEUE_DEPTH};
use log::{debug, warn};
use spark_media::capture::FrameSource;
use spark_media::Image;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tokio::time::{interval_at, sleep, Instant, Interval, MissedTickBehavior};

#[derive(Debug)]
struct PendingResume {
    generation: u64,
    command: MotionCommand,
    timer: JoinHandle<()>,
}

enum Wake {
    Event(Option<SessionEvent>),
    Tick,
}

/// Owns every piece of mutable vehicle state and serializes all changes to it.
pub struct PilotSession<S, C: Connector> {
    source: S,
    connector: C,
    link_target: LinkTarget,
    dispatcher: CommandDispatcher<C::Link>,
    engine: DecisionEngine,
    status: Arc<dyn StatusSink>,
    settings: SessionSettings,
    frame_size: (u32, u32),
    detecting: bool,
    ticker: Option<Interval>,
    resume: Option<PendingResume>,
    generation: u64,
    link_epoch: u64,
    snapshot_dir: Option<PathBuf>,
    snapshot_index: u64,
    events: mpsc::Receiver<SessionEvent>,
    loopback: mpsc::WeakSender<SessionEvent>,
}

impl<S, C> PilotSession<S, C>
where
    S: FrameSource + 'static,
    C: Connector,
{
    pub fn new(config: &RoverConfig, source: S, connector: C, status: Arc<dyn StatusSink>) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let settings = SessionSettings::from_config(config);
        status.set_settings(&settings);

        let session = PilotSession {
            source,
            connector,
            link_target: config.link.clone(),
            dispatcher: CommandDispatcher::new(),
            engine: DecisionEngine::new(),
            status,
            settings,
            frame_size: (config.capture.width, config.capture.height),
            detecting: false,
            ticker: None,
            resume: None,
            generation: 0,
            link_epoch: 0,
            snapshot_dir: config.snapshot_dir.clone(),
            snapshot_index: 0,
            events: rx,
            loopback: tx.downgrade(),
        };
        (session, SessionHandle::new(tx))
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn is_detecting(&self) -> bool {
        self.detecting
    }

    pub fn is_camera_active(&self) -> bool {
        self.source.is_active()
    }

    pub fn is_connected(&self) -> bool {
        self.dispatcher.is_connected()
    }

    pub fn command_count(&self) -> u64 {
        self.dispatcher.command_count()
    }

    pub fn has_pending_resume(&self) -> bool {
        self.resume.is_some()
    }

    /// Waits for the next queued event without handling it.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Runs until `Shutdown` arrives or every handle is dropped.
    pub async fn run(mut self) {
        self.status.append_log("System ready", Severity::Success);

        loop {
            let wake = match self.ticker.as_mut() {
                Some(ticker) => tokio::select! {
                    event = self.events.recv() => Wake::Event(event),
                    _ = ticker.tick() => Wake::Tick,
                },
                None => Wake::Event(self.events.recv().await),
            };

            match wake {
                Wake::Tick => self.cycle().await,
                Wake::Event(None) | Wake::Event(Some(SessionEvent::Shutdown)) => break,
                Wake::Event(Some(event)) => self.handle(event).await,
            }
        }

        self.shutdown().await;
    }

    pub async fn handle(&mut self, event: SessionEvent) {
        debug!("Session event: {:?}", event);
        match event {
            SessionEvent::StartCamera => self.start_camera(),
            SessionEvent::StopCamera => self.stop_camera(),
            SessionEvent::StartDetection => self.start_detection(),
            SessionEvent::StopDetection => self.stop_detection(),
            SessionEvent::ToggleDetection => {
                if self.detecting {
                    self.stop_detection()
                } else {
                    self.start_detection()
                }
            }
            SessionEvent::Connect => self.connect().await,
            SessionEvent::Disconnect => self.disconnect().await,
            SessionEvent::LinkLost { link } if link == self.link_epoch => self.disconnect().await,
            SessionEvent::LinkLost { link } => debug!("Ignoring loss of replaced link #{}", link),
            SessionEvent::Manual(kind) => {
                let magnitude = match kind {
                    CommandKind::Stop => 0,
                    _ => self.settings.manual_speed,
                };
                self.send(MotionCommand::new(kind, magnitude)).await;
            }
            SessionEvent::UpdateConfig(update) => {
                for change in self.settings.apply(&update) {
                    self.status.append_log(&change, Severity::Info);
                }
                self.status.set_settings(&self.settings);
            }
            SessionEvent::ClearLog => self.status.clear_log(),
            SessionEvent::Resume { generation } => self.resume(generation).await,
            SessionEvent::Shutdown => self.shutdown().await,
        }
    }

    fn start_camera(&mut self) {
        if self.source.is_active() {
            return;
        }

        let (width, height) = self.frame_size;
        match self.source.start(width, height) {
            Ok(size) => {
                self.frame_size = size;
                self.status
                    .set_status(StatusKey::Camera, "Camera: active", StatusState::Connected);
                self.status.append_log(
                    &format!("Camera started ({}x{})", size.0, size.1),
                    Severity::Success,
                );
            }
            Err(e) => {
                self.status
                    .set_status(StatusKey::Camera, "Camera: unavailable", StatusState::Disconnected);
                self.status.append_log(&format!("Camera error: {:#}", e), Severity::Error);
            }
        }
    }

    fn stop_camera(&mut self) {
        if self.detecting {
            self.stop_detection();
        }
        self.source.stop();
        self.status
            .set_status(StatusKey::Camera, "Camera: inactive", StatusState::Disconnected);
        self.status.append_log("Camera stopped", Severity::Warning);
    }

    fn start_detection(&mut self) {
        if !self.source.is_active() {
            self.status
                .append_log("Start the camera before enabling detection", Severity::Warning);
            return;
        }
        if self.detecting {
            return;
        }

        let period = self.settings.interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.ticker = Some(ticker);
        self.detecting = true;

        self.status
            .set_status(StatusKey::Detection, "Detection: active", StatusState::Connected);
        self.status.append_log("Detection enabled", Severity::Success);
    }

    fn stop_detection(&mut self) {
        if !self.detecting {
            return;
        }

        self.detecting = false;
        self.ticker = None;
        self.cancel_resume();
        self.status.clear_alerts();
        self.status.set_overlay(Overlay::default());

        self.status
            .set_status(StatusKey::Detection, "Detection: inactive", StatusState::Disconnected);
        self.status.append_log("Detection disabled", Severity::Warning);
    }

    async fn connect(&mut self) {
        if self.dispatcher.is_connected() {
            return;
        }

        self.status.append_log(
            &format!("Connecting to {}...", self.link_target.address),
            Severity::Info,
        );
        self.link_epoch += 1;
        let watch = self.link_watch(self.link_epoch);
        match self.connector.connect(&self.link_target, watch).await {
            Ok(link) => {
                self.dispatcher.attach(link);
                self.status
                    .set_status(StatusKey::Link, "Link: connected", StatusState::Connected);
                self.status.append_log(
                    &format!("Connected to {}", self.link_target.address),
                    Severity::Success,
                );
            }
            Err(e) => {
                self.status.append_log(&format!("Link error: {}", e), Severity::Error);
            }
        }
    }

    fn link_watch(&self, link: u64) -> LinkWatch {
        let loopback = self.loopback.clone();
        LinkWatch::new(move || {
            if let Some(events) = loopback.upgrade() {
                if events.try_send(SessionEvent::LinkLost { link }).is_err() {
                    warn!("Event queue full, loss of link #{} not reported", link);
                }
            }
        })
    }

    async fn disconnect(&mut self) {
        if let Some(mut link) = self.dispatcher.detach() {
            link.close().await;
            self.link_lost();
        }
    }

    fn link_lost(&mut self) {
        self.dispatcher.detach();
        self.status
            .set_status(StatusKey::Link, "Link: disconnected", StatusState::Disconnected);
        self.status
            .append_log("Disconnected from the motor controller", Severity::Warning);
    }

    async fn send(&mut self, command: MotionCommand) {
        match self.dispatcher.dispatch(command).await {
            Ok(()) => {
                self.status.set_command_count(self.dispatcher.command_count());
                self.status
                    .append_log(&format!("Command sent: {}", command), Severity::Info);
            }
            Err(DispatchError::NotConnected) => {
                self.status
                    .append_log("Motor controller not connected", Severity::Warning);
            }
            Err(e) => {
                self.status
                    .append_log(&format!("Error sending command: {}", e), Severity::Error);
                if !self.dispatcher.is_connected() {
                    self.link_lost();
                }
            }
        }
    }

    /// One detection cycle. Does nothing unless detection is active.
    pub async fn cycle(&mut self) {
        if !self.detecting {
            return;
        }

        let frame = match self.source.grab() {
            Ok(Some(frame)) => frame,
            Ok(None) => return,
            Err(e) => {
                self.status
                    .append_log(&format!("Frame capture failed: {:#}", e), Severity::Error);
                return;
            }
        };

        let colors = self.settings.selected_colors;
        let analysis = spawn_blocking(move || {
            let readings = analyze_frame(&frame, &colors);
            (frame, readings)
        })
        .await;
        let (frame, readings) = match analysis {
            Ok(result) => result,
            Err(e) => {
                self.status
                    .append_log(&format!("Detection fault, cycle skipped: {}", e), Severity::Error);
                return;
            }
        };
        debug!("{}", readings);

        let decision = self.engine.decide(&readings, &self.settings.decision_context());
        self.apply(decision, &frame, &readings).await;
    }

    async fn apply(&mut self, decision: Decision, frame: &Image, readings: &FrameReadings) {
        self.send(decision.command).await;

        if let Some(alert) = &decision.alert {
            self.status.set_alert(alert.kind, &alert.message, true);
        }
        self.status.set_display(&decision.display);

        let overlay = Overlay::describe(frame.get_width(), frame.get_height(), readings);
        if self.snapshot_dir.is_some() {
            self.save_snapshot(frame, &overlay).await;
        }
        self.status.set_overlay(overlay);

        if let Some(plan) = decision.resume {
            self.schedule_resume(plan);
        }
    }

    async fn save_snapshot(&mut self, frame: &Image, overlay: &Overlay) {
        let Some(dir) = self.snapshot_dir.as_ref() else {
            return;
        };

        let annotated = match annotate(frame, &self.settings.selected_colors, overlay) {
            Ok(image) => image,
            Err(e) => {
                warn!("Failed to annotate snapshot: {:#}", e);
                return;
            }
        };
        let path = dir.join(format!("frame_{:06}.png", self.snapshot_index));
        self.snapshot_index += 1;

        match spawn_blocking(move || annotated.save(&path)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to write snapshot: {:#}", e),
            Err(e) => warn!("Snapshot task failed: {}", e),
        }
    }

    /// A newer plan supersedes the pending one.
    fn schedule_resume(&mut self, plan: ResumePlan) {
        self.cancel_resume();
        self.generation += 1;

        let generation = self.generation;
        let loopback = self.loopback.clone();
        let timer = tokio::spawn(async move {
            sleep(plan.after).await;
            if let Some(events) = loopback.upgrade() {
                let _ = events.send(SessionEvent::Resume { generation }).await;
            }
        });

        self.resume = Some(PendingResume {
            generation,
            command: plan.command,
            timer,
        });
    }

    fn cancel_resume(&mut self) {
        if let Some(pending) = self.resume.take() {
            pending.timer.abort();
        }
    }

    async fn resume(&mut self, generation: u64) {
        let command = match &self.resume {
            Some(pending) if pending.generation == generation => pending.command,
            _ => {
                debug!("Ignoring stale resume {}", generation);
                return;
            }
        };
        self.resume = None;

        if self.detecting {
            self.send(command).await;
        }
    }

    async fn shutdown(&mut self) {
        self.stop_detection();
        if self.source.is_active() {
            self.source.stop();
        }
        if let Some(mut link) = self.dispatcher.detach() {
            link.close().await;
        }
        self.events.close();
    }
}
