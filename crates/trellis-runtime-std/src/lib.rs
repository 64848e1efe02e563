//! Standard runtime services backed by Rust's `std` library.
//!
//! This crate provides concrete implementations of the platform traits
//! defined in `trellis-core`. Hosts construct a [`StdRuntime`], hand its
//! scheduler to a composition and poll [`StdRuntime::take_frame_request`]
//! from their event loop.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use trellis_core::{Clock, RuntimeScheduler, UiExecutor, UiTask};

type Waker = Arc<dyn Fn() + Send + Sync + 'static>;

/// Scheduler that records frame requests and wakes the host.
pub struct StdScheduler {
    frame_requested: AtomicBool,
    frame_waker: RwLock<Option<Waker>>,
}

impl StdScheduler {
    pub fn new() -> Self {
        Self {
            frame_requested: AtomicBool::new(false),
            frame_waker: RwLock::new(None),
        }
    }

    /// Returns whether a frame has been requested since the last call.
    pub fn take_frame_request(&self) -> bool {
        self.frame_requested.swap(false, Ordering::SeqCst)
    }

    /// Registers a waker that will be invoked whenever a new frame is scheduled.
    pub fn set_frame_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        *self
            .frame_waker
            .write()
            .expect("frame waker lock poisoned") = Some(Arc::new(waker));
    }

    pub fn clear_frame_waker(&self) {
        *self
            .frame_waker
            .write()
            .expect("frame waker lock poisoned") = None;
    }

    fn wake(&self) {
        let waker = self
            .frame_waker
            .read()
            .expect("frame waker lock poisoned")
            .clone();
        if let Some(waker) = waker {
            waker();
        }
    }
}

impl Default for StdScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StdScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdScheduler")
            .field(
                "frame_requested",
                &self.frame_requested.load(Ordering::SeqCst),
            )
            .finish()
    }
}

impl RuntimeScheduler for StdScheduler {
    fn schedule_frame(&self) {
        self.frame_requested.store(true, Ordering::SeqCst);
        self.wake();
    }
}

/// Clock implementation backed by [`std::time`].
#[derive(Debug, Default, Clone)]
pub struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn elapsed_millis(&self, since: Self::Instant) -> u64 {
        since.elapsed().as_millis() as u64
    }
}

impl StdClock {
    pub fn elapsed(&self, since: Instant) -> Duration {
        since.elapsed()
    }
}

/// Tasks posted from any thread, run when the UI thread drains the queue.
///
/// Posting schedules a frame on the attached scheduler so the host wakes up
/// to drain.
pub struct UiThreadQueue {
    sender: Mutex<Sender<UiTask>>,
    receiver: Mutex<Receiver<UiTask>>,
    scheduler: Option<Arc<StdScheduler>>,
}

impl UiThreadQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender: Mutex::new(sender),
            receiver: Mutex::new(receiver),
            scheduler: None,
        }
    }

    /// Requests a frame on `scheduler` for every posted task.
    pub fn with_scheduler(mut self, scheduler: Arc<StdScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Runs every task posted so far, in posting order. Returns how many ran.
    pub fn drain(&self) -> usize {
        let tasks: Vec<UiTask> = {
            let receiver = self.receiver.lock().expect("ui queue lock poisoned");
            receiver.try_iter().collect()
        };
        let count = tasks.len();
        for task in tasks {
            task();
        }
        if count > 0 {
            log::trace!("drained {count} ui tasks");
        }
        count
    }
}

impl Default for UiThreadQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UiThreadQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiThreadQueue")
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl UiExecutor for UiThreadQueue {
    fn post(&self, task: UiTask) {
        let sent = self
            .sender
            .lock()
            .expect("ui queue lock poisoned")
            .send(task);
        if sent.is_err() {
            log::warn!("ui queue closed; dropping posted task");
            return;
        }
        if let Some(scheduler) = &self.scheduler {
            scheduler.schedule_frame();
        }
    }
}

/// Convenience container bundling the standard scheduler, clock and UI queue.
#[derive(Clone)]
pub struct StdRuntime {
    scheduler: Arc<StdScheduler>,
    clock: Arc<StdClock>,
    ui_queue: Arc<UiThreadQueue>,
}

impl StdRuntime {
    pub fn new() -> Self {
        let scheduler = Arc::new(StdScheduler::default());
        let ui_queue = Arc::new(UiThreadQueue::new().with_scheduler(Arc::clone(&scheduler)));
        Self {
            scheduler,
            clock: Arc::new(StdClock),
            ui_queue,
        }
    }

    pub fn scheduler(&self) -> Arc<StdScheduler> {
        Arc::clone(&self.scheduler)
    }

    pub fn clock(&self) -> Arc<StdClock> {
        Arc::clone(&self.clock)
    }

    /// Executor background threads post state writes to.
    pub fn ui_queue(&self) -> Arc<UiThreadQueue> {
        Arc::clone(&self.ui_queue)
    }

    /// Returns whether a frame was requested since the last poll.
    pub fn take_frame_request(&self) -> bool {
        self.scheduler.take_frame_request()
    }

    pub fn set_frame_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        self.scheduler.set_frame_waker(waker);
    }

    pub fn clear_frame_waker(&self) {
        self.scheduler.clear_frame_waker();
    }

    /// Runs tasks posted to the UI queue on the calling thread.
    pub fn drain_ui(&self) -> usize {
        self.ui_queue.drain()
    }
}

impl fmt::Debug for StdRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdRuntime")
            .field("scheduler", &self.scheduler)
            .field("clock", &self.clock)
            .finish()
    }
}

impl Default for StdRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/std_runtime_tests.rs"]
mod tests;
