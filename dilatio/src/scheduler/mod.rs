//! The delayed-execution engine.
//!
//! Components, leaf to root:
//! - [`pending`]: deadline-ordered store of accepted jobs,
//! - [`shared`]: the lock, shutdown latch and condition variables,
//! - [`dispatcher`]: the thread deciding when the soonest job is due,
//! - [`worker`]: threads that take due jobs and run them,
//! - [`core`]: the [`Scheduler`] facade tying them together.

mod dispatcher;
mod pending;
mod shared;
mod worker;

pub(crate) mod builder;
pub(crate) mod core;

pub use self::builder::SchedulerBuilder;
pub use self::core::Scheduler;
