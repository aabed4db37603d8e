//! Tempo spectator tooling
//!
//! Ties the packet timelines to the transform engine: rolling counters that
//! animate towards a player's values at the clock time, and the
//! `tempo-inspect` packet dump inspector.

pub mod counter;
pub mod inspect;

pub use counter::{
    AccuracySource, ComboSource, HitCountSource, RollingCounter, ScoreSource, ValueSource,
};
