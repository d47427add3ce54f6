//! Off-thread decoding so an interactive caller never blocks on a full board.
//!
//! Cancellation is dropping: a dropped [`Job`] discards its frame, and a
//! newer [`RenderWorker::submit`] supersedes every earlier one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::BoardConfig;
use crate::error::{DecodeError, WorkerError};
use crate::pipeline::decode_board;
use crate::unpack::Frame;

/// Identifies one submission to a [`RenderWorker`]. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

/// A finished submission.
#[derive(Debug)]
pub struct Rendered {
    pub ticket: Ticket,
    pub result: Result<Frame, DecodeError>,
}

/// A single decode running on its own thread.
pub struct Job {
    rx: Receiver<Result<Frame, DecodeError>>,
}

/// Decode `text` on a new thread.
pub fn spawn(text: String, config: BoardConfig) -> Result<Job, WorkerError> {
    let (tx, rx) = mpsc::sync_channel(1);
    thread::Builder::new()
        .name("bitgrid-job".into())
        .spawn(move || {
            // receiver gone means the job was cancelled
            let _ = tx.send(decode_board(&text, &config));
        })?;
    Ok(Job { rx })
}

impl Job {
    /// The frame if it is ready.
    pub fn try_frame(&self) -> Option<Result<Frame, DecodeError>> {
        self.rx.try_recv().ok()
    }

    /// Block until the frame is ready.
    pub fn wait(self) -> Result<Result<Frame, DecodeError>, WorkerError> {
        self.rx.recv().map_err(|_| WorkerError::Stopped)
    }
}

struct Request {
    ticket: u64,
    text: String,
}

/// Long-lived render thread where only the newest submission matters.
pub struct RenderWorker {
    requests: Option<Sender<Request>>,
    results: Receiver<Rendered>,
    latest: Arc<AtomicU64>,
    next: u64,
    handle: Option<JoinHandle<()>>,
}

impl RenderWorker {
    pub fn new(config: BoardConfig) -> Result<Self, WorkerError> {
        let (req_tx, req_rx) = mpsc::channel::<Request>();
        let (res_tx, res_rx) = mpsc::channel();
        let latest = Arc::new(AtomicU64::new(0));
        let handle = {
            let latest = latest.clone();
            thread::Builder::new()
                .name("bitgrid-render".into())
                .spawn(move || render_loop(config, req_rx, res_tx, latest))?
        };
        Ok(Self {
            requests: Some(req_tx),
            results: res_rx,
            latest,
            next: 0,
            handle: Some(handle),
        })
    }

    /// Queue a snapshot, superseding anything submitted before.
    pub fn submit(&mut self, text: impl Into<String>) -> Result<Ticket, WorkerError> {
        self.next += 1;
        let ticket = self.next;
        self.latest.store(ticket, Ordering::Release);
        let requests = self.requests.as_ref().ok_or(WorkerError::Stopped)?;
        requests
            .send(Request {
                ticket,
                text: text.into(),
            })
            .map_err(|_| WorkerError::Stopped)?;
        Ok(Ticket(ticket))
    }

    /// The newest submission's result if it has finished. Never blocks.
    /// Results for superseded submissions are discarded.
    pub fn latest(&self) -> Option<Rendered> {
        let mut newest = None;
        loop {
            match self.results.try_recv() {
                Ok(r) if self.is_current(&r) => newest = Some(r),
                Ok(_) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return newest,
            }
        }
    }

    /// Block until the newest submission has finished.
    pub fn wait_latest(&self) -> Result<Rendered, WorkerError> {
        loop {
            let r = self.results.recv().map_err(|_| WorkerError::Stopped)?;
            if self.is_current(&r) {
                return Ok(r);
            }
        }
    }

    fn is_current(&self, r: &Rendered) -> bool {
        r.ticket.0 == self.latest.load(Ordering::Acquire)
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        // closing the request channel ends the loop
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("render thread panicked");
            }
        }
    }
}

fn render_loop(
    config: BoardConfig,
    requests: Receiver<Request>,
    results: Sender<Rendered>,
    latest: Arc<AtomicU64>,
) {
    while let Ok(mut req) = requests.recv() {
        while let Ok(newer) = requests.try_recv() {
            req = newer;
        }
        if req.ticket != latest.load(Ordering::Acquire) {
            continue;
        }

        let result = decode_board(&req.text, &config);

        if req.ticket != latest.load(Ordering::Acquire) {
            log::debug!("dropping stale frame {}", req.ticket);
            continue;
        }
        let rendered = Rendered {
            ticket: Ticket(req.ticket),
            result,
        };
        if results.send(rendered).is_err() {
            break;
        }
    }
}
