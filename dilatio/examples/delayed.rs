//! Example: Running closures after a delay

use dilatio::Scheduler;
use std::time::{Duration, Instant};

fn main() -> dilatio::Result<()> {
    let scheduler = Scheduler::new(2)?;
    let start = Instant::now();

    // Submitted out of order, run by deadline
    for ms in [300u64, 100, 200] {
        scheduler.run_after(Duration::from_millis(ms), move || {
            println!("{ms}ms job ran at {:?}", start.elapsed());
        })?;
    }

    let answer = scheduler.run_after(Duration::from_millis(50), || 6 * 7)?;
    println!("answer = {:?}", answer.join());

    // Wait for everything still pending
    scheduler.wait();
    println!("Done!");

    Ok(())
}
