//! Cooperative per-frame task list.
//!
//! Every frame runs all `Controllers` tasks before any `Renderers` task, so
//! values a controller publishes are visible to renderers in the same frame.
//! Within a phase tasks run in registration order.

use std::cell::Cell;
use std::rc::Rc;

/// Upper bound on the frame delta handed to tasks; longer gaps (tab switch,
/// debugger pause) are treated as one slow frame.
pub const MAX_FRAME_DT_SEC: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Controllers,
    Renderers,
}

/// What a task did this frame. `Skipped` means a precondition was missing;
/// the task stays scheduled and is retried next frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Ran,
    Skipped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the first frame.
    pub now_sec: f64,
    pub dt_sec: f32,
    pub frame: u64,
}

/// Cancels the task it was returned for. Cloning shares the flag.
#[derive(Clone, Debug, Default)]
pub struct LoopHandle(Rc<Cell<bool>>);

impl LoopHandle {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub ran: usize,
    pub skipped: usize,
    pub removed: usize,
}

struct Task {
    name: &'static str,
    phase: Phase,
    handle: LoopHandle,
    run: Box<dyn FnMut(&FrameTime) -> TaskStatus>,
}

#[derive(Default)]
pub struct FrameScheduler {
    tasks: Vec<Task>,
    start: Option<f64>,
    last: Option<f64>,
    frame: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        name: &'static str,
        phase: Phase,
        run: impl FnMut(&FrameTime) -> TaskStatus + 'static,
    ) -> LoopHandle {
        let handle = LoopHandle::default();
        let at = self
            .tasks
            .iter()
            .position(|t| t.phase > phase)
            .unwrap_or(self.tasks.len());
        self.tasks.insert(
            at,
            Task {
                name,
                phase,
                handle: handle.clone(),
                run: Box::new(run),
            },
        );
        log::debug!("[schedule] added {name} ({phase:?})");
        handle
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run one frame at host time `now_sec`.
    pub fn run_frame(&mut self, now_sec: f64) -> FrameStats {
        let mut stats = FrameStats::default();
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.handle.is_cancelled());
        stats.removed = before - self.tasks.len();

        let start = *self.start.get_or_insert(now_sec);
        let dt = match self.last {
            Some(last) => (now_sec - last).clamp(0.0, MAX_FRAME_DT_SEC),
            None => 0.0,
        };
        self.last = Some(now_sec);
        let time = FrameTime {
            now_sec: now_sec - start,
            dt_sec: dt as f32,
            frame: self.frame,
        };

        for task in self.tasks.iter_mut() {
            // A task may cancel a later one within the same frame.
            if task.handle.is_cancelled() {
                continue;
            }
            match (task.run)(&time) {
                TaskStatus::Ran => stats.ran += 1,
                TaskStatus::Skipped => {
                    stats.skipped += 1;
                    log::debug!("[schedule] {} skipped frame {}", task.name, time.frame);
                }
            }
        }
        self.frame += 1;
        stats
    }

    pub fn cancel_all(&mut self) {
        for t in &self.tasks {
            t.handle.cancel();
        }
        let n = self.tasks.len();
        self.tasks.clear();
        if n > 0 {
            log::info!("[schedule] cancelled {n} tasks");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn delta_is_clamped() {
        let mut s = FrameScheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        s.add("clock", Phase::Controllers, move |t| {
            sink.borrow_mut().push(t.dt_sec);
            TaskStatus::Ran
        });
        s.run_frame(10.0);
        s.run_frame(10.016);
        s.run_frame(15.0);
        let seen = seen.borrow();
        assert_eq!(seen[0], 0.0);
        assert!((seen[1] - 0.016).abs() < 1e-5);
        assert!((seen[2] - MAX_FRAME_DT_SEC as f32).abs() < 1e-6);
    }
}
