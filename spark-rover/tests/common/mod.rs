#![allow(dead_code)]

use bytes::Bytes;
use parking_lot::Mutex;
use spark_media::capture::FrameQueue;
use spark_media::{Image, RGB};
use spark_rover::config::RoverConfig;
use spark_rover::control::{Connector, LinkError, LinkTarget, LinkWatch, Transport};
use spark_rover::presentation::StatusBoard;
use spark_rover::session::{PilotSession, SessionHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Connector whose links record every payload, or report the peer as gone.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    written: Arc<Mutex<Vec<String>>>,
    peer_gone: Arc<AtomicBool>,
    watch: Arc<Mutex<Option<LinkWatch>>>,
}

impl Recorder {
    pub fn sent(&self) -> Vec<String> {
        self.written.lock().clone()
    }

    /// The next write fails with `Closed`.
    pub fn drop_peer(&self) {
        self.peer_gone.store(true, Ordering::SeqCst);
    }

    /// The peer goes away and says so through the watch of the latest link.
    pub fn hang_up(&self) {
        self.drop_peer();
        if let Some(watch) = self.watch.lock().as_ref() {
            watch.peer_lost();
        }
    }
}

pub struct RecordingLink(Recorder);

impl Transport for RecordingLink {
    async fn write(&mut self, payload: Bytes) -> Result<(), LinkError> {
        if self.0.peer_gone.load(Ordering::SeqCst) {
            return Err(LinkError::Closed);
        }
        self.0
            .written
            .lock()
            .push(String::from_utf8_lossy(&payload).into_owned());
        Ok(())
    }

    async fn close(&mut self) {}
}

impl Connector for Recorder {
    type Link = RecordingLink;

    async fn connect(&self, _target: &LinkTarget, watch: LinkWatch) -> Result<RecordingLink, LinkError> {
        *self.watch.lock() = Some(watch);
        Ok(RecordingLink(self.clone()))
    }
}

pub fn road() -> Image {
    Image::filled(100, 100, RGB::BLACK)
}

/// A white stripe at column `x` over the full height.
pub fn stripe(x: u32) -> Image {
    let mut frame = road();
    frame.fill_rect(x, 0, 1, 100, RGB::WHITE);
    frame
}

/// Two stripes inside the road region, mirrored around the centerline.
pub fn centered() -> Image {
    let mut frame = road();
    frame.fill_rect(20, 60, 1, 40, RGB::WHITE);
    frame.fill_rect(80, 60, 1, 40, RGB::WHITE);
    frame
}

pub fn stop_sign() -> Image {
    let mut frame = road();
    frame.fill_rect(0, 0, 100, 50, RGB(220, 20, 20));
    frame
}

/// Alternating columns: the central window is full of edges.
pub fn obstacle() -> Image {
    let mut frame = road();
    for x in (0..100).step_by(2) {
        frame.fill_rect(x, 0, 1, 100, RGB::WHITE);
    }
    frame
}

pub fn session(
    frames: Vec<Image>,
) -> (PilotSession<FrameQueue, Recorder>, SessionHandle, Recorder, StatusBoard) {
    let recorder = Recorder::default();
    let board = StatusBoard::new();
    let (session, handle) = PilotSession::new(
        &RoverConfig::default(),
        FrameQueue::new(frames),
        recorder.clone(),
        Arc::new(board.clone()),
    );
    (session, handle, recorder, board)
}
