use std::sync::atomic::AtomicUsize;
use std::thread;

use trellis_core::{with_frame, MutableValue, PersistentState, StateOptions};

use super::*;

#[test]
fn frame_requests_are_taken_once() {
    let scheduler = StdScheduler::new();
    assert!(!scheduler.take_frame_request());

    scheduler.schedule_frame();
    scheduler.schedule_frame();
    assert!(scheduler.take_frame_request());
    assert!(!scheduler.take_frame_request());
}

#[test]
fn waker_runs_on_every_request_until_cleared() {
    let scheduler = StdScheduler::new();
    let wakes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&wakes);
    scheduler.set_frame_waker(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    scheduler.schedule_frame();
    scheduler.schedule_frame();
    assert_eq!(wakes.load(Ordering::SeqCst), 2);

    scheduler.clear_frame_waker();
    scheduler.schedule_frame();
    assert_eq!(wakes.load(Ordering::SeqCst), 2);
}

#[test]
fn clock_measures_from_an_instant() {
    let clock = StdClock;
    let start = clock.now();
    thread::sleep(Duration::from_millis(5));
    assert!(clock.elapsed_millis(start) >= 5);
    assert!(clock.elapsed(start) >= Duration::from_millis(5));
}

#[test]
fn state_changes_request_a_frame() {
    let runtime = StdRuntime::new();
    let mut store = PersistentState::new();
    let scheduler = runtime.scheduler();
    store.set_on_state_change(move || scheduler.schedule_frame());

    let count = with_frame(&mut store, |store| {
        store.must_state("count", || 0, StateOptions::default())
    });
    assert!(!runtime.take_frame_request());

    count.set(1);
    assert!(runtime.take_frame_request(), "a write should request a frame");
    assert_eq!(count.get_untracked(), 1);
}

#[test]
fn background_writes_land_when_the_ui_thread_drains() {
    let runtime = StdRuntime::new();
    let value = MutableValue::new(0);
    let ui_thread = thread::current().id();
    let seen_on = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&seen_on);
    value
        .subscribe(move |v: &i32| {
            record
                .lock()
                .expect("poisoned")
                .push((*v, thread::current().id()));
        })
        .detach();

    let queue = runtime.ui_queue();
    let handle = value.clone();
    thread::spawn(move || {
        handle.post_set(&*queue, 7);
        handle.post_set(&*queue, 8);
    })
    .join()
    .expect("writer thread panicked");

    assert_eq!(value.get_untracked(), 0, "nothing runs before the drain");
    assert!(runtime.take_frame_request(), "posting should request a frame");

    assert_eq!(runtime.drain_ui(), 2);
    assert_eq!(value.get_untracked(), 8);
    assert_eq!(
        *seen_on.lock().expect("poisoned"),
        vec![(7, ui_thread), (8, ui_thread)]
    );
    assert_eq!(runtime.drain_ui(), 0);
}

#[test]
fn queue_without_scheduler_still_runs_tasks() {
    let queue = UiThreadQueue::new();
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    queue.post(Box::new(move || flag.store(true, Ordering::SeqCst)));
    assert!(!ran.load(Ordering::SeqCst));
    assert_eq!(queue.drain(), 1);
    assert!(ran.load(Ordering::SeqCst));
}
