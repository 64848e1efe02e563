//! Platform abstraction traits for runtime services.
//!
//! These traits let the runtime delegate frame scheduling, time and
//! cross-thread hand-off to the host without depending on a concrete
//! event loop.

/// Schedules work for the runtime.
///
/// Implementations trigger frame processing on behalf of the composition
/// driver. They must be safe to use from multiple threads.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Provides timing information for the runtime.
pub trait Clock: Send + Sync {
    /// Instant type produced by this clock implementation.
    type Instant: Copy + Send + Sync;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64;
}

/// A task handed to the UI thread.
pub type UiTask = Box<dyn FnOnce() + Send>;

/// Runs tasks on the UI thread.
///
/// Background threads post state writes here so subscribers and the change
/// notifier fire on the thread that composes.
pub trait UiExecutor: Send + Sync {
    fn post(&self, task: UiTask);
}
