//! Background path requests.
//!
//! A [`PathWorker`] runs searches on its own thread against a shared,
//! read-only [`Grid`]. Requests go in over one channel and replies come
//! back over another, in submission order. Several workers may share the
//! same `Arc<Grid>`; each keeps a private [`Pathfinder`].

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use glam::Vec3;

use crate::astar::Pathfinder;
use crate::grid::Grid;
use crate::request::RequestId;

/// The outcome of one background request.
#[derive(Clone, Debug, PartialEq)]
pub struct PathReply {
    pub id: RequestId,
    /// Simplified waypoints; empty on failure.
    pub waypoints: Vec<Vec3>,
    pub success: bool,
}

struct Job {
    id: RequestId,
    start: Vec3,
    end: Vec3,
}

/// Handle to a pathfinding thread.
///
/// Dropping the handle closes the request channel, lets the thread finish
/// the requests already queued, and joins it.
pub struct PathWorker {
    grid: Arc<Grid>,
    job_tx: Option<Sender<Job>>,
    reply_rx: Receiver<PathReply>,
    handle: Option<JoinHandle<()>>,
    next_id: u64,
}

impl PathWorker {
    /// Start a worker thread searching `grid`.
    pub fn spawn(grid: Arc<Grid>) -> io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (reply_tx, reply_rx) = mpsc::channel::<PathReply>();

        let shared = Arc::clone(&grid);
        let handle = thread::Builder::new()
            .name("wayfind-worker".into())
            .spawn(move || run(&shared, job_rx, reply_tx))?;

        Ok(Self {
            grid,
            job_tx: Some(job_tx),
            reply_rx,
            handle: Some(handle),
            next_id: 0,
        })
    }

    /// The grid this worker searches.
    #[inline]
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    /// Queue a search. Returns `None` if the worker thread has stopped.
    pub fn submit(&mut self, start: Vec3, end: Vec3) -> Option<RequestId> {
        let tx = self.job_tx.as_ref()?;
        let id = RequestId(self.next_id);
        tx.send(Job { id, start, end }).ok()?;
        self.next_id += 1;
        Some(id)
    }

    /// Block until the next reply. `None` once the worker has stopped and
    /// every reply has been received.
    pub fn recv(&self) -> Option<PathReply> {
        self.reply_rx.recv().ok()
    }

    /// The next reply if one is ready.
    pub fn try_recv(&self) -> Option<PathReply> {
        self.reply_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<PathReply> {
        self.reply_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for PathWorker {
    fn drop(&mut self) {
        self.job_tx = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("path worker thread panicked");
            }
        }
    }
}

fn run(grid: &Grid, jobs: Receiver<Job>, replies: Sender<PathReply>) {
    let mut pathfinder = Pathfinder::new(grid);
    log::debug!("path worker started on {}x{} grid", grid.size().x, grid.size().y);

    for Job { id, start, end } in jobs {
        let (reply, fatal) = match pathfinder.find_path(grid, start, end) {
            Ok(path) => (
                PathReply {
                    id,
                    waypoints: path.waypoints,
                    success: true,
                },
                false,
            ),
            Err(e) => {
                if e.is_fatal() {
                    log::error!("path request {id} aborted, stopping worker: {e}");
                } else {
                    log::trace!("path request {id} failed: {e}");
                }
                (
                    PathReply {
                        id,
                        waypoints: Vec::new(),
                        success: false,
                    },
                    e.is_fatal(),
                )
            }
        };
        if replies.send(reply).is_err() || fatal {
            break;
        }
    }
    log::debug!("path worker stopped");
}
