//! Per-member transform replay
//!
//! Transforms for one member are kept sorted by start time. Updates walk
//! from cached cursors instead of from the start, and stay correct when the
//! update time moves backwards:
//!
//! * On a rewind, transforms that start after the new time are unwound in
//!   reverse order, each restoring the value it started from.
//! * Walking forward, a transform followed by one that has already started
//!   is finished at that successor's start time before the successor runs,
//!   so overlapping transforms hand over without a jump.
//! * A transform added at or before the last update time changes history.
//!   The next update unwinds everything that started at or after it,
//!   including any transform it replaced, and replays from there.

use crate::transform::Transform;
use tracing::trace;

pub struct TransformTracker<T> {
    member: &'static str,
    transforms: Vec<Transform<T>>,
    last_update_time: f64,
    /// Latest transform applied by the previous update
    last_applied: Option<usize>,
    /// Every transform before this index is finished and superseded
    first_active: usize,
    /// Earliest start among transforms added into already-updated time
    pending_unwind: Option<f64>,
    /// Replaced transforms whose effect is still on the target
    replaced: Vec<Transform<T>>,
}

impl<T> TransformTracker<T> {
    pub fn new(member: &'static str) -> Self {
        Self {
            member,
            transforms: Vec::new(),
            last_update_time: f64::NEG_INFINITY,
            last_applied: None,
            first_active: 0,
            pending_unwind: None,
            replaced: Vec::new(),
        }
    }

    pub fn member(&self) -> &'static str {
        self.member
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transforms(&self) -> &[Transform<T>] {
        &self.transforms
    }

    pub fn last_update_time(&self) -> f64 {
        self.last_update_time
    }

    /// Whether the next update has to unwind part of the history first
    pub fn has_pending_unwind(&self) -> bool {
        self.pending_unwind.is_some()
    }

    /// End time of the transform that ends last
    pub fn end_time(&self) -> Option<f64> {
        self.transforms
            .iter()
            .map(Transform::end_time)
            .reduce(f64::max)
    }

    /// Insert a transform. One starting at the same time as an existing
    /// transform replaces it.
    pub fn add(&mut self, transform: Transform<T>) {
        debug_assert_eq!(transform.member(), self.member);

        let start = transform.start_time();
        let index = self
            .transforms
            .partition_point(|t| t.start_time() < start);

        match self.transforms.get(index) {
            Some(existing) if existing.start_time() == start => {
                let old = std::mem::replace(&mut self.transforms[index], transform);
                // A rewind past its start has already undone it
                if old.has_started() && start <= self.last_update_time {
                    self.replaced.push(old);
                }
            }
            _ => {
                self.transforms.insert(index, transform);
                if let Some(last) = self.last_applied.as_mut() {
                    if index <= *last {
                        *last += 1;
                    }
                }
            }
        }

        if start <= self.last_update_time {
            self.pending_unwind = Some(self.pending_unwind.map_or(start, |t| t.min(start)));
        }
        self.first_active = 0;
    }

    /// Remove every transform starting at or after `time`
    pub fn clear_transforms_after(&mut self, time: f64) {
        let keep = self
            .transforms
            .partition_point(|t| t.start_time() < time);
        self.transforms.truncate(keep);

        self.last_applied = match (self.last_applied, keep.checked_sub(1)) {
            (Some(last), Some(max)) => Some(last.min(max)),
            _ => None,
        };
        self.first_active = 0;
    }

    /// Bring the member to its state at `time`
    pub fn update(&mut self, target: &mut T, time: f64) {
        if let Some(from) = self.pending_unwind.take() {
            self.unwind_from(target, from);
        }
        if time < self.last_update_time {
            self.rewind(target, time);
        }

        let mut j = self.first_active;
        while j < self.transforms.len() && self.transforms[j].start_time() <= time {
            let successor_start = self
                .transforms
                .get(j + 1)
                .map(Transform::start_time)
                .filter(|&start| start <= time);

            let transform = &mut self.transforms[j];
            match successor_start {
                Some(start) => transform.finish_at(target, start),
                None => transform.apply(target, time),
            }

            if transform.is_finished() && j == self.first_active {
                self.first_active += 1;
            }
            self.last_applied = Some(j);
            j += 1;
        }

        self.last_update_time = time;
    }

    /// Undo, latest first, every applied transform starting at or after
    /// `from` along with the replaced ones
    fn unwind_from(&mut self, target: &mut T, from: f64) {
        let mut replaced = std::mem::take(&mut self.replaced);
        replaced.sort_by(|a, b| a.start_time().total_cmp(&b.start_time()));

        let mut i = self.last_applied.map_or(0, |last| last + 1);
        loop {
            let current = i
                .checked_sub(1)
                .map(|k| self.transforms[k].start_time())
                .filter(|&start| start >= from);
            let old = replaced.last().map(Transform::start_time);
            match (current, old) {
                (Some(start), Some(old_start)) if old_start > start => {
                    if let Some(mut transform) = replaced.pop() {
                        transform.unwind(target);
                    }
                }
                (Some(_), _) => {
                    i -= 1;
                    self.transforms[i].unwind(target);
                }
                (None, Some(_)) => {
                    if let Some(mut transform) = replaced.pop() {
                        transform.unwind(target);
                    }
                }
                (None, None) => break,
            }
        }

        self.last_applied = i.checked_sub(1);
        self.first_active = 0;
        trace!(
            "Unwound {} from {:.1}ms, replay resumes at transform {}",
            self.member,
            from,
            i
        );
    }

    fn rewind(&mut self, target: &mut T, time: f64) {
        let mut i = self.last_applied.map_or(0, |last| last + 1);
        while i > 0 && self.transforms[i - 1].start_time() > time {
            i -= 1;
            self.transforms[i].rewind_to(target, time);
        }

        self.last_applied = i.checked_sub(1);
        self.first_active = self.first_active.min(i.saturating_sub(1));
        trace!(
            "Rewound {} to {:.1}ms, replay resumes at transform {}",
            self.member,
            time,
            self.first_active
        );
    }
}
