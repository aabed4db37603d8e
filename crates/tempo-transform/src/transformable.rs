//! Owner of a target value and its transform trackers

use crate::clock::{ClockSource, MediaPosition};
use crate::sequence::Sequence;
use crate::tracker::TransformTracker;
use crate::transform::Transform;
use std::collections::BTreeMap;

pub struct Transformable<T> {
    target: T,
    clock: ClockSource,
    trackers: BTreeMap<&'static str, TransformTracker<T>>,
}

impl<T: Default> Default for Transformable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Transformable<T> {
    /// Owner driven by its own manual clock starting at zero
    pub fn new(target: T) -> Self {
        Self::with_clock(target, ClockSource::default())
    }

    /// Owner whose current time follows a media element
    pub fn with_media(target: T, media: MediaPosition) -> Self {
        Self::with_clock(target, ClockSource::Media(media))
    }

    pub fn with_clock(target: T, clock: ClockSource) -> Self {
        Self {
            target,
            clock,
            trackers: BTreeMap::new(),
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Direct access to the target. Members with transforms will be
    /// overwritten by the next update.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    pub fn clock(&self) -> &ClockSource {
        &self.clock
    }

    pub fn current_time(&self) -> f64 {
        self.clock.current_time()
    }

    /// Whether the last manual clock update moved backwards
    pub fn is_rewinding(&self) -> bool {
        matches!(&self.clock, ClockSource::Manual(clock) if clock.is_rewinding())
    }

    /// Move a manual clock to `time` and apply every transform as of it.
    /// A media clock is left alone; its position is owned by the media.
    pub fn update(&mut self, time: f64) {
        if let ClockSource::Manual(clock) = &mut self.clock {
            clock.update(time);
        }
        self.update_transforms(time);
    }

    /// Apply every transform as of the clock's current time
    pub fn update_from_clock(&mut self) {
        let time = self.current_time();
        self.update_transforms(time);
    }

    fn update_transforms(&mut self, time: f64) {
        for tracker in self.trackers.values_mut() {
            tracker.update(&mut self.target, time);
        }
    }

    pub fn add_transform(&mut self, transform: Transform<T>) {
        self.trackers
            .entry(transform.member())
            .or_insert_with(|| TransformTracker::new(transform.member()))
            .add(transform);
    }

    /// Drop every transform, on every member, starting at or after `time`
    pub fn clear_transforms_after(&mut self, time: f64) {
        for tracker in self.trackers.values_mut() {
            tracker.clear_transforms_after(time);
        }
        self.trackers
            .retain(|_, tracker| !tracker.is_empty() || tracker.has_pending_unwind());
    }

    pub fn clear_transforms(&mut self) {
        self.trackers.clear();
    }

    pub fn tracker(&self, member: &str) -> Option<&TransformTracker<T>> {
        self.trackers.get(member)
    }

    pub fn has_transforms(&self) -> bool {
        !self.trackers.is_empty()
    }

    /// End time of the transform that ends last, across every member
    pub fn latest_transform_end_time(&self) -> Option<f64> {
        self.trackers
            .values()
            .filter_map(TransformTracker::end_time)
            .reduce(f64::max)
    }
}

impl<T: 'static> Transformable<T> {
    /// Start a fluent sequence whose transforms begin at absolute `time`
    pub fn begin_absolute_sequence(&mut self, time: f64) -> Sequence<'_, T> {
        let delay = time - self.current_time();
        self.begin_delayed_sequence(delay)
    }

    /// Start a fluent sequence whose transforms begin `delay` ms from now
    pub fn begin_delayed_sequence(&mut self, delay: f64) -> Sequence<'_, T> {
        Sequence::new(self, delay)
    }
}
