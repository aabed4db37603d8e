//! Per-player event timelines for Tempo
//!
//! Ingests decoded spectator packets into time-indexed containers and
//! answers point-in-time queries for any clock position, forward or
//! backward. All types here assume exclusive single-threaded access: a
//! timeline is owned by whoever drives the frame loop.

pub mod aggregate;
pub mod container;
pub mod event;
pub mod indexed;
pub mod ingest;
pub mod mods;
pub mod objects;
pub mod player;

pub use aggregate::TimelineAggregator;
pub use container::EventContainer;
pub use event::{
    Accuracy, AccuracyEvent, ClickEvent, Combo, ComboEvent, Countable, CountableEvent,
    CursorEvent, IndexedEvent, JudgementEvent, Origin, Score, ScoreEvent, Sentinel,
    TimelineEvent,
};
pub use indexed::IndexOrderedContainer;
pub use mods::{BeatmapInfo, DifficultyOverrides, HitWindows, Mod, Mods};
pub use objects::ObjectContainer;
pub use player::{PlayerTimeline, TimelineConfig};
pub use tempo_protocol::{HitResult, MovementKind};

use std::fmt;
use tempo_protocol::ProtocolError;
use thiserror::Error;

/// Identifier of a spectated player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Object index {index} out of range for {count} objects")]
    ObjectIndexOutOfRange { index: i32, count: usize },

    #[error("Too many touch points: {got} (max {max})")]
    TooManyTouchPoints { got: usize, max: usize },
}
