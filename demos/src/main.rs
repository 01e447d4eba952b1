//! wayfind-demo: run a pathfinding scenario and print the results.
//!
//! ```text
//! wayfind-demo [--worker] [scenario.json]
//! ```
//!
//! Without a file the built-in courtyard scenario runs. Requests go through
//! the cooperative [`RequestQueue`] by default, or through a background
//! [`PathWorker`] with `--worker`. Set `RUST_LOG=debug` for search timings.

mod render;
mod scenario;

use std::cell::RefCell;
use std::error::Error;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec3;
use wayfind_core::Point;
use wayfind_paths::{Grid, PathWorker, Pathfinder, RequestQueue};

use scenario::Scenario;

struct Outcome {
    start: Vec3,
    end: Vec3,
    waypoints: Vec<Vec3>,
    success: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut use_worker = false;
    let mut path: Option<PathBuf> = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--worker" => use_worker = true,
            _ => path = Some(PathBuf::from(arg)),
        }
    }

    let scenario = match &path {
        Some(p) => Scenario::load(p)?,
        None => Scenario::builtin()?,
    };
    let grid = scenario.build_grid()?;
    let size = grid.size();
    println!(
        "{}: {}x{} grid, {} walkable, penalties {}..={}",
        if scenario.name.is_empty() { "scenario" } else { scenario.name.as_str() },
        size.x,
        size.y,
        grid.walkable_count(),
        grid.penalty_range().min,
        grid.penalty_range().max
    );

    let (outcomes, last_path) = if use_worker {
        run_worker(grid.clone(), &scenario)?
    } else {
        run_queue(&grid, &scenario)?
    };

    for (i, o) in outcomes.iter().enumerate() {
        let status = if o.success { "ok" } else { "no path" };
        println!("request {i}: {} -> {}: {status}", o.start, o.end);
        for w in &o.waypoints {
            println!("    {w}");
        }
    }

    let mut marks = Vec::new();
    if let Some(o) = outcomes.iter().rev().find(|o| o.success) {
        marks.push((grid.cell_at(o.start), 'S'));
        marks.push((grid.cell_at(o.end), 'T'));
    }
    println!();
    print!("{}", render::render(&grid, &last_path, &marks));
    Ok(())
}

/// Dispatch every request through a [`RequestQueue`] on this thread.
fn run_queue(grid: &Grid, scenario: &Scenario) -> Result<(Vec<Outcome>, Vec<Point>), Box<dyn Error>> {
    let results: Rc<RefCell<Vec<Outcome>>> = Rc::default();
    let mut queue = RequestQueue::new();
    for r in &scenario.requests {
        let results = Rc::clone(&results);
        let (start, end) = (r.start, r.end);
        queue.submit(start, end, move |waypoints, success| {
            results.borrow_mut().push(Outcome {
                start,
                end,
                waypoints,
                success,
            });
        });
    }

    let mut pathfinder = Pathfinder::new(grid);
    queue.process_all(&mut pathfinder, grid)?;
    let outcomes = results.take();
    Ok((outcomes, pathfinder.last_path().to_vec()))
}

/// Dispatch every request to a background [`PathWorker`].
fn run_worker(grid: Grid, scenario: &Scenario) -> Result<(Vec<Outcome>, Vec<Point>), Box<dyn Error>> {
    let grid = Arc::new(grid);
    let mut worker = PathWorker::spawn(Arc::clone(&grid))?;
    let mut sent = Vec::new();
    for r in &scenario.requests {
        match worker.submit(r.start, r.end) {
            Some(id) => sent.push((id, *r)),
            None => return Err("path worker stopped".into()),
        }
    }

    let mut outcomes = Vec::with_capacity(sent.len());
    for (id, request) in sent {
        let reply = worker.recv().ok_or("path worker stopped before replying")?;
        debug_assert_eq!(reply.id, id);
        outcomes.push(Outcome {
            start: request.start,
            end: request.end,
            waypoints: reply.waypoints,
            success: reply.success,
        });
    }

    // The worker keeps its search state private; show the waypoint cells.
    let last_path = outcomes
        .iter()
        .rev()
        .find(|o| o.success)
        .map(|o| o.waypoints.iter().map(|&w| grid.cell_at(w)).collect())
        .unwrap_or_default();
    Ok((outcomes, last_path))
}
