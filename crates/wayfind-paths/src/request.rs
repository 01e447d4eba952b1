//! Cooperative path requests.
//!
//! A [`RequestQueue`] collects `(start, end, callback)` requests and runs
//! them one at a time whenever the owner has time to spare, typically once
//! per frame. Each search runs to completion inside
//! [`process_next`](RequestQueue::process_next); there is no suspension
//! inside the A* loop and no cancellation.

use std::collections::VecDeque;
use std::fmt;

use glam::Vec3;

use crate::astar::{PathError, Pathfinder};
use crate::grid::Grid;
use crate::heap::HeapError;

/// Identifies a submitted request. Ids increase in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Completion callback: simplified waypoints, and whether a path was found.
/// On failure the waypoint list is empty.
pub type PathCallback = Box<dyn FnOnce(Vec<Vec3>, bool)>;

struct PathRequest {
    id: RequestId,
    start: Vec3,
    end: Vec3,
    callback: PathCallback,
}

/// FIFO of pending path requests.
#[derive(Default)]
pub struct RequestQueue {
    pending: VecDeque<PathRequest>,
    next_id: u64,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests waiting to run.
    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue a request. `callback` runs exactly once, from whichever call
    /// to [`process_next`](Self::process_next) picks the request up.
    pub fn submit<F>(&mut self, start: Vec3, end: Vec3, callback: F) -> RequestId
    where
        F: FnOnce(Vec<Vec3>, bool) + 'static,
    {
        let id = RequestId(self.next_id);
        self.next_id += 1;
        log::trace!("queued path request {id}: {start} -> {end}");
        self.pending.push_back(PathRequest {
            id,
            start,
            end,
            callback: Box::new(callback),
        });
        id
    }

    /// Run the oldest request and report it through its callback.
    ///
    /// Returns the id of the request that ran, or `None` if the queue was
    /// empty. Ordinary failures (unwalkable endpoint, unreachable target)
    /// reach the callback as `success == false` and are not errors here. A
    /// heap error means the pathfinder is broken: the callback still sees a
    /// failure, then the error is returned.
    pub fn process_next(
        &mut self,
        pathfinder: &mut Pathfinder,
        grid: &Grid,
    ) -> Result<Option<RequestId>, HeapError> {
        let Some(request) = self.pending.pop_front() else {
            return Ok(None);
        };
        let PathRequest {
            id,
            start,
            end,
            callback,
        } = request;

        match pathfinder.find_path(grid, start, end) {
            Ok(path) => {
                log::trace!("path request {id} succeeded with {} waypoints", path.waypoints.len());
                callback(path.waypoints, true);
            }
            Err(PathError::Heap(e)) => {
                log::error!("path request {id} aborted: {e}");
                callback(Vec::new(), false);
                return Err(e);
            }
            Err(e) => {
                log::trace!("path request {id} failed: {e}");
                callback(Vec::new(), false);
            }
        }
        Ok(Some(id))
    }

    /// Run every pending request. Returns how many ran.
    pub fn process_all(&mut self, pathfinder: &mut Pathfinder, grid: &Grid) -> Result<usize, HeapError> {
        let mut ran = 0;
        while self.process_next(pathfinder, grid)?.is_some() {
            ran += 1;
        }
        Ok(ran)
    }
}

impl fmt::Debug for RequestQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestQueue")
            .field("pending", &self.pending.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
