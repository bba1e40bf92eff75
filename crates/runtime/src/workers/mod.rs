//! Worker tasks that back collection handles.
//!
//! Each collection runs one worker that serializes its store operations.

mod collection;

pub(crate) use collection::{Command, CollectionWorker};
