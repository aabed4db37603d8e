//! Event records stored on a player's timeline
//!
//! Every record is an immutable value keyed by a time in milliseconds.
//! Records are created once during ingestion and never mutated after they
//! are inserted into a container.

use glam::Vec2;
use std::fmt;
use tempo_protocol::{HitResult, MovementKind, Tickset};

/// A record addressable by time
pub trait TimelineEvent: Clone + fmt::Debug {
    /// Time in milliseconds
    fn time(&self) -> f64;

    /// Whether `self` may be dropped in favour of `other` when both share a
    /// timestamp. Containers ask the stored event with the incoming one as
    /// `other`.
    fn is_redundant(&self, other: &Self) -> bool {
        self.time() == other.time()
    }
}

/// A record that also carries a beatmap object index
pub trait IndexedEvent: TimelineEvent {
    fn object_index(&self) -> i32;
}

/// Placeholder returned when a query has no qualifying event
pub trait Sentinel {
    fn sentinel() -> Self;
}

/// Cursor sample for one touch point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorEvent {
    pub time: f64,
    /// `None` for `up` samples and for the sentinel
    pub position: Option<Vec2>,
    pub kind: MovementKind,
}

impl TimelineEvent for CursorEvent {
    fn time(&self) -> f64 {
        self.time
    }
}

impl Sentinel for CursorEvent {
    fn sentinel() -> Self {
        Self {
            time: f64::NEG_INFINITY,
            position: None,
            kind: MovementKind::Up,
        }
    }
}

/// Down transition of a touch point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub time: f64,
}

impl TimelineEvent for ClickEvent {
    fn time(&self) -> f64 {
        self.time
    }
}

impl Sentinel for ClickEvent {
    fn sentinel() -> Self {
        Self {
            time: f64::NEG_INFINITY,
        }
    }
}

/// Judgement for a single hit object, with the player's running totals at
/// the time it was awarded
#[derive(Debug, Clone, PartialEq)]
pub struct JudgementEvent {
    pub time: f64,
    pub object_index: i32,
    pub accuracy_offset: i16,
    pub tickset: Tickset,
    pub result: HitResult,
    pub running_score: Score,
    pub running_combo: Combo,
    pub running_accuracy: Accuracy,
}

impl TimelineEvent for JudgementEvent {
    fn time(&self) -> f64 {
        self.time
    }
}

impl IndexedEvent for JudgementEvent {
    fn object_index(&self) -> i32 {
        self.object_index
    }
}

impl Sentinel for JudgementEvent {
    fn sentinel() -> Self {
        Self {
            time: f64::NEG_INFINITY,
            object_index: -1,
            accuracy_offset: 0,
            tickset: Tickset::default(),
            result: HitResult::Miss,
            running_score: Score::INITIAL,
            running_combo: Combo::INITIAL,
            running_accuracy: Accuracy::INITIAL,
        }
    }
}

/// A value the player's client reports on every tick
pub trait Countable: Copy + fmt::Debug + PartialEq {
    /// Value before any report arrives
    const INITIAL: Self;

    fn as_f64(self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Score(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Combo(pub i32);

/// Accuracy as a fraction in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Accuracy(pub f64);

impl Countable for Score {
    const INITIAL: Self = Score(0);

    fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl Countable for Combo {
    const INITIAL: Self = Combo(0);

    fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl Countable for Accuracy {
    const INITIAL: Self = Accuracy(1.0);

    fn as_f64(self) -> f64 {
        self.0
    }
}

/// Where a countable value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Regular tick snapshot
    Tick,
    /// Drift correction re-sent with every packet; never redundant
    Synced { object_index: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountableEvent<V> {
    pub time: f64,
    pub value: V,
    pub origin: Origin,
}

pub type ScoreEvent = CountableEvent<Score>;
pub type ComboEvent = CountableEvent<Combo>;
pub type AccuracyEvent = CountableEvent<Accuracy>;

impl<V: Countable> CountableEvent<V> {
    pub fn tick(time: f64, value: V) -> Self {
        Self {
            time,
            value,
            origin: Origin::Tick,
        }
    }

    pub fn synced(time: f64, value: V, object_index: i32) -> Self {
        Self {
            time,
            value,
            origin: Origin::Synced { object_index },
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self.origin, Origin::Synced { .. })
    }
}

impl<V: Countable> TimelineEvent for CountableEvent<V> {
    fn time(&self) -> f64 {
        self.time
    }

    fn is_redundant(&self, other: &Self) -> bool {
        !self.is_synced() && !other.is_synced() && self.time == other.time
    }
}

impl<V: Countable> IndexedEvent for CountableEvent<V> {
    fn object_index(&self) -> i32 {
        match self.origin {
            Origin::Synced { object_index } => object_index,
            Origin::Tick => -1,
        }
    }
}

impl<V: Countable> Sentinel for CountableEvent<V> {
    fn sentinel() -> Self {
        Self::tick(f64::NEG_INFINITY, V::INITIAL)
    }
}
