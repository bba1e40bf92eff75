//! Change notifications published by score collections.
//!
//! Every successful mutation of a collection publishes one [`ScoreEvent`] on
//! the collection's [`EventBus`]. Any number of observers may subscribe.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::{Operation, ScoreEvent};
