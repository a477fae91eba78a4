use dilatio::Scheduler;
use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::task::{Context, Poll, Wake};
use std::thread::{self, Thread};
use std::time::{Duration, Instant};

struct ThreadWaker(Thread);

impl Wake for ThreadWaker {
    fn wake(self: Arc<Self>) {
        self.0.unpark();
    }
}

/// Minimal executor: polls `future` on the current thread, parking between
/// polls.
fn block_on<F: Future>(future: F) -> F::Output {
    let mut future = pin!(future);
    let waker = Arc::new(ThreadWaker(thread::current())).into();
    let mut cx = Context::from_waker(&waker);

    loop {
        match future.as_mut().poll(&mut cx) {
            Poll::Ready(output) => return output,
            Poll::Pending => thread::park(),
        }
    }
}

#[test]
fn test_is_finished() {
    let scheduler = Scheduler::new(1).unwrap();

    let handle = scheduler.run_after(Duration::from_millis(30), || 1).unwrap();
    assert!(!handle.is_finished());

    scheduler.wait();

    assert!(handle.is_finished());
    assert_eq!(handle.join().unwrap(), 1);
}

#[test]
fn test_join_timeout_gives_handle_back() {
    let scheduler = Scheduler::new(1).unwrap();

    let handle = scheduler.run_after(Duration::from_millis(150), || "late").unwrap();

    let start = Instant::now();
    let handle = handle
        .join_timeout(Duration::from_millis(20))
        .expect_err("job cannot be done yet");
    assert!(start.elapsed() >= Duration::from_millis(20));

    let outcome = handle
        .join_timeout(Duration::from_secs(5))
        .expect("job finishes within the timeout");
    assert_eq!(outcome.unwrap(), "late");
}

#[test]
fn test_handle_as_future() {
    let scheduler = Scheduler::new(2).unwrap();

    let submitted = Instant::now();
    let handle = scheduler
        .run_after(Duration::from_millis(25), || vec![1, 2, 3])
        .unwrap();

    let value = block_on(handle).unwrap();

    assert_eq!(value, vec![1, 2, 3]);
    assert!(submitted.elapsed() >= Duration::from_millis(25));
}

#[test]
fn test_future_sees_panic() {
    let scheduler = Scheduler::new(1).unwrap();

    let handle = scheduler
        .run_after(Duration::from_millis(5), || -> u8 { panic!("async boom") })
        .unwrap();

    let failure = block_on(handle).unwrap_err();
    assert_eq!(failure.message(), "async boom");
}

#[test]
fn test_join_many_handles_from_other_threads() {
    let scheduler = Scheduler::new(4).unwrap();

    let handles: Vec<_> = (0..16u64)
        .map(|i| {
            scheduler
                .run_after(Duration::from_millis(1 + i), move || i * i)
                .unwrap()
        })
        .collect();

    let joiners: Vec<_> = handles
        .into_iter()
        .map(|handle| thread::spawn(move || handle.join().unwrap()))
        .collect();

    let total: u64 = joiners.into_iter().map(|j| j.join().unwrap()).sum();
    assert_eq!(total, (0..16u64).map(|i| i * i).sum());
}

#[test]
#[should_panic(expected = "JoinHandle polled after completion")]
fn test_join_after_await_panics() {
    let scheduler = Scheduler::new(1).unwrap();

    let mut handle = scheduler.run_after(Duration::from_millis(5), || 3).unwrap();
    assert_eq!(block_on(&mut handle).unwrap(), 3);

    let _ = handle.join();
}

#[test]
#[should_panic(expected = "JoinHandle polled after completion")]
fn test_join_timeout_after_await_panics() {
    let scheduler = Scheduler::new(1).unwrap();

    let mut handle = scheduler.run_after(Duration::from_millis(5), || 3).unwrap();
    assert_eq!(block_on(&mut handle).unwrap(), 3);

    let _ = handle.join_timeout(Duration::from_millis(10));
}
