//! Units of work and their completion handles.
//!
//! A submitted closure is split in two halves:
//! - a type-erased [`Job`] that the scheduler stores and a worker invokes once,
//! - a typed [`JoinHandle`] the submitter keeps to collect the outcome.
//!
//! Both halves share a [`Completion`] slot that is filled exactly once,
//! either with the closure's return value or with the captured panic.

pub(crate) mod core;
pub(crate) mod handle;

pub(crate) use self::core::{Completion, Job};

pub use handle::JoinHandle;
