mod common;

use dilatio::Scheduler;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[test]
fn test_panicking_job_reports_through_its_handle() {
    common::init_tracing();
    let scheduler = Scheduler::new(1).unwrap();

    let failing = scheduler
        .run_after(Duration::from_millis(5), || -> u32 { panic!("disk on fire") })
        .unwrap();
    let healthy = scheduler.run_after(Duration::from_millis(20), || 7u32).unwrap();

    let failure = failing.join().unwrap_err();
    assert_eq!(failure.message(), "disk on fire");
    assert_eq!(healthy.join().unwrap(), 7);
}

#[test]
fn test_formatted_panic_message_is_kept() {
    let scheduler = Scheduler::new(1).unwrap();

    let handle = scheduler
        .run_after(Duration::from_millis(1), || -> u8 {
            let code = 3;
            panic!("exit code {code}");
        })
        .unwrap();

    let failure: dilatio::TaskFailure = handle.join().unwrap_err();
    assert_eq!(failure.message(), "exit code 3");
    assert_eq!(failure.to_string(), "task panicked: exit code 3");
}

#[test]
fn test_worker_survives_repeated_panics() {
    let scheduler = Scheduler::new(1).unwrap();
    let ran = Arc::new(AtomicUsize::new(0));

    for i in 0..10u64 {
        let ran = ran.clone();
        scheduler
            .run_after(Duration::from_millis(1 + i), move || {
                ran.fetch_add(1, Ordering::SeqCst);
                if i % 2 == 0 {
                    panic!("job {i} failed");
                }
            })
            .unwrap();
    }

    scheduler.wait();

    assert_eq!(ran.load(Ordering::SeqCst), 10);
}

#[test]
fn test_unobserved_failure_does_not_stop_the_scheduler() {
    let scheduler = Scheduler::new(2).unwrap();

    drop(
        scheduler
            .run_after(Duration::from_millis(1), || -> u8 { panic!("nobody is listening") })
            .unwrap(),
    );

    let later = scheduler.run_after(Duration::from_millis(30), || "still running").unwrap();
    assert_eq!(later.join().unwrap(), "still running");
}

#[test]
fn test_job_errors_travel_as_values() {
    let scheduler = Scheduler::new(1).unwrap();

    let handle = scheduler
        .run_after(Duration::from_millis(1), || "12x".parse::<u32>())
        .unwrap();

    let outcome = handle.join().expect("job did not panic");
    assert!(outcome.is_err());
}
