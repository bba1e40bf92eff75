//! Score records and ranking rules for the memory tile game.
//!
//! `game-core` defines the [`Statistic`] value recorded for every finished
//! game and the pure ranking functions used to order score lists. It carries
//! no I/O; persistence and list synchronization live in the runtime crate.
pub mod ranking;
pub mod statistic;

pub use ranking::{compare, create_time, is_ranked};
pub use statistic::{Statistic, StatisticKey};
