//! # Dilatio
//!
//! **Dilatio** is an in-process delayed-execution engine for the **Nebula**
//! ecosystem: hand it a closure and a target time, and one of a bounded set
//! of worker threads runs it no earlier than that time.
//!
//! It offers:
//!
//! - **Deadline ordering**: among due jobs, the earliest deadline always
//!   goes first, and no job ever starts before its deadline
//! - **A fixed worker pool** with jobs executed outside the scheduler lock
//! - **Completion handles** that deliver each job's result or panic exactly
//!   once, by blocking or as a [`Future`]
//! - **Drain-to-completion shutdown**: [`Scheduler::wait`] stops
//!   intake and returns once every accepted job has run
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dilatio::Scheduler;
//! use std::time::Duration;
//!
//! let scheduler = Scheduler::new(4)?;
//!
//! let handle = scheduler.run_after(Duration::from_millis(100), || {
//!     println!("Task completed!");
//!     42
//! })?;
//!
//! assert_eq!(handle.join().unwrap(), 42);
//! scheduler.wait();
//! ```
//!
//! ## Modules
//!
//! - [`task`] — Completion handles for submitted jobs
//! - [`time`] — Absolute and relative target times

mod error;
mod scheduler;

pub mod task;
pub mod time;

pub use error::{Error, Result, TaskFailure};
pub use scheduler::{Scheduler, SchedulerBuilder};
pub use task::JoinHandle;
pub use time::When;
