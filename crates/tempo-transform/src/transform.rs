//! A single eased change to one member of a target

use crate::easing::Easing;
use crate::interpolate::Interpolate;
use std::fmt;

/// Reads and writes one member of the target
trait MemberAction<T> {
    fn capture(&mut self, target: &T);
    fn is_captured(&self) -> bool;
    /// Forget a start value that was read from the target
    fn release(&mut self);
    fn apply(&mut self, target: &mut T, eased: f64);
}

struct PropertyAction<T, V> {
    get: fn(&T) -> V,
    set: fn(&mut T, V),
    start: Option<V>,
    fixed_start: bool,
    end: V,
}

impl<T, V: Interpolate> MemberAction<T> for PropertyAction<T, V> {
    fn capture(&mut self, target: &T) {
        if self.start.is_none() {
            self.start = Some((self.get)(target));
        }
    }

    fn is_captured(&self) -> bool {
        self.start.is_some()
    }

    fn release(&mut self) {
        if !self.fixed_start {
            self.start = None;
        }
    }

    fn apply(&mut self, target: &mut T, eased: f64) {
        if let Some(start) = &self.start {
            (self.set)(target, V::interpolate(start, &self.end, eased));
        }
    }
}

/// Eased change of one named member over `[start_time, start_time + duration]`
///
/// The start value is read from the target the first time the transform is
/// applied unless it was given up front.
pub struct Transform<T> {
    member: &'static str,
    start_time: f64,
    duration: f64,
    easing: Easing,
    action: Box<dyn MemberAction<T>>,
    last_progress: Option<f64>,
    finished: bool,
}

impl<T: 'static> Transform<T> {
    /// # Panics
    ///
    /// Panics if `start_time` is not finite or `duration` is negative or NaN.
    pub fn new<V: Interpolate>(
        member: &'static str,
        start_time: f64,
        duration: f64,
        easing: Easing,
        get: fn(&T) -> V,
        set: fn(&mut T, V),
        end: V,
    ) -> Self {
        let action = PropertyAction {
            get,
            set,
            start: None,
            fixed_start: false,
            end,
        };
        Self::with_action(member, start_time, duration, easing, Box::new(action))
    }

    /// Like [`new`](Self::new) with a fixed start value
    #[allow(clippy::too_many_arguments)]
    pub fn from_to<V: Interpolate>(
        member: &'static str,
        start_time: f64,
        duration: f64,
        easing: Easing,
        get: fn(&T) -> V,
        set: fn(&mut T, V),
        start: V,
        end: V,
    ) -> Self {
        let action = PropertyAction {
            get,
            set,
            start: Some(start),
            fixed_start: true,
            end,
        };
        Self::with_action(member, start_time, duration, easing, Box::new(action))
    }

    fn with_action(
        member: &'static str,
        start_time: f64,
        duration: f64,
        easing: Easing,
        action: Box<dyn MemberAction<T>>,
    ) -> Self {
        assert!(
            start_time.is_finite(),
            "transform start time must be finite, got {start_time}"
        );
        assert!(
            duration >= 0.0,
            "transform duration must be non-negative, got {duration}"
        );

        Self {
            member,
            start_time,
            duration,
            easing,
            action,
            last_progress: None,
            finished: false,
        }
    }
}

impl<T> Transform<T> {
    pub fn member(&self) -> &'static str {
        self.member
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the transform has been applied since it was created
    pub fn has_started(&self) -> bool {
        self.last_progress.is_some()
    }

    /// Linear progress in `0.0..=1.0` at `time`
    pub fn progress_at(&self, time: f64) -> f64 {
        if self.duration == 0.0 {
            return if time >= self.start_time { 1.0 } else { 0.0 };
        }
        ((time - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    /// Apply the transform as of `time`. Re-applying at the same progress
    /// does nothing.
    pub fn apply(&mut self, target: &mut T, time: f64) {
        let progress = self.progress_at(time);
        if self.last_progress == Some(progress) {
            return;
        }

        self.action.capture(target);
        self.write(target, progress);
    }

    /// Apply as of `time` and mark the transform finished, used when a later
    /// transform on the same member takes over
    pub fn finish_at(&mut self, target: &mut T, time: f64) {
        self.apply(target, time);
        self.finished = true;
    }

    /// Apply as of an earlier `time` unconditionally. Transforms that never
    /// ran are left alone.
    pub fn rewind_to(&mut self, target: &mut T, time: f64) {
        if !self.action.is_captured() || self.last_progress.is_none() {
            return;
        }
        let progress = self.progress_at(time);
        self.write(target, progress);
    }

    /// Restore the value the transform started from and forget that it ran,
    /// so the next apply reads its start value from the target again
    pub fn unwind(&mut self, target: &mut T) {
        if self.action.is_captured() && self.last_progress.is_some() {
            self.action.apply(target, 0.0);
        }
        self.action.release();
        self.last_progress = None;
        self.finished = false;
    }

    fn write(&mut self, target: &mut T, progress: f64) {
        self.action.apply(target, self.easing.apply(progress));
        self.last_progress = Some(progress);
        self.finished = progress >= 1.0;
    }
}

impl<T> fmt::Debug for Transform<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("member", &self.member)
            .field("start_time", &self.start_time)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("last_progress", &self.last_progress)
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sprite {
        alpha: f64,
        writes: usize,
    }

    fn alpha(sprite: &Sprite) -> f64 {
        sprite.alpha
    }

    fn set_alpha(sprite: &mut Sprite, alpha: f64) {
        sprite.alpha = alpha;
        sprite.writes += 1;
    }

    fn fade(start_time: f64, duration: f64, end: f64) -> Transform<Sprite> {
        Transform::new("alpha", start_time, duration, Easing::None, alpha, set_alpha, end)
    }

    #[test]
    fn test_start_value_captured_on_first_apply() {
        let mut sprite = Sprite {
            alpha: 0.4,
            ..Default::default()
        };
        let mut transform = fade(100.0, 100.0, 1.0);

        transform.apply(&mut sprite, 150.0);
        assert!((sprite.alpha - 0.7).abs() < 1e-9);

        sprite.alpha = 0.0;
        transform.apply(&mut sprite, 200.0);
        assert!((sprite.alpha - 1.0).abs() < 1e-9);
        assert!(transform.is_finished());

        transform.apply(&mut sprite, 100.0);
        assert!((sprite.alpha - 0.4).abs() < 1e-9);
        assert!(!transform.is_finished());
    }

    #[test]
    fn test_same_progress_is_not_reapplied() {
        let mut sprite = Sprite::default();
        let mut transform = fade(0.0, 10.0, 1.0);

        transform.apply(&mut sprite, 20.0);
        transform.apply(&mut sprite, 30.0);
        assert_eq!(sprite.writes, 1);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut sprite = Sprite::default();
        let mut transform = fade(50.0, 0.0, 1.0);

        assert_eq!(transform.progress_at(49.9), 0.0);
        transform.apply(&mut sprite, 50.0);
        assert_eq!(sprite.alpha, 1.0);
        assert!(transform.is_finished());
    }

    #[test]
    fn test_rewind_skips_unstarted_transform() {
        let mut sprite = Sprite {
            alpha: 0.5,
            ..Default::default()
        };
        let mut transform = fade(100.0, 10.0, 1.0);
        transform.rewind_to(&mut sprite, 0.0);
        assert_eq!(sprite.alpha, 0.5);
        assert!(!transform.has_started());
    }

    #[test]
    fn test_fixed_start_value() {
        let mut sprite = Sprite {
            alpha: 0.9,
            ..Default::default()
        };
        let mut transform =
            Transform::from_to("alpha", 0.0, 10.0, Easing::None, alpha, set_alpha, 0.0, 1.0);
        transform.apply(&mut sprite, 5.0);
        assert_eq!(sprite.alpha, 0.5);
    }

    #[test]
    fn test_unwind_restores_and_recaptures() {
        let mut sprite = Sprite {
            alpha: 0.2,
            ..Default::default()
        };
        let mut transform = fade(0.0, 10.0, 1.0);
        transform.apply(&mut sprite, 5.0);
        assert!((sprite.alpha - 0.6).abs() < 1e-9);

        transform.unwind(&mut sprite);
        assert!((sprite.alpha - 0.2).abs() < 1e-9);
        assert!(!transform.has_started());

        sprite.alpha = 0.0;
        transform.apply(&mut sprite, 5.0);
        assert!((sprite.alpha - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_unwind_keeps_fixed_start() {
        let mut sprite = Sprite::default();
        let mut transform =
            Transform::from_to("alpha", 0.0, 10.0, Easing::None, alpha, set_alpha, 0.4, 1.0);
        transform.unwind(&mut sprite);
        assert_eq!(sprite.writes, 0);

        transform.apply(&mut sprite, 10.0);
        transform.unwind(&mut sprite);
        assert_eq!(sprite.alpha, 0.4);
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn test_negative_duration_panics() {
        fade(0.0, -1.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "finite")]
    fn test_infinite_start_panics() {
        fade(f64::INFINITY, 1.0, 1.0);
    }
}
