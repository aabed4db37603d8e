//! Fluent transform declarations
//!
//! ```ignore
//! sprite
//!     .begin_absolute_sequence(1000.0)
//!     .fade_in(200.0, Easing::OutQuad)
//!     .then()
//!     .move_to(Vec2::new(0.0, 50.0), 300.0, Easing::None);
//! ```

use crate::easing::Easing;
use crate::interpolate::Interpolate;
use crate::transform::Transform;
use crate::transformable::Transformable;
use glam::Vec2;

/// Target with an opacity member
pub trait Fadeable {
    fn alpha(&self) -> f32;
    fn set_alpha(&mut self, alpha: f32);
}

/// Target with a position member
pub trait Movable {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
}

/// Target with a scale member
pub trait Scalable {
    fn scale(&self) -> Vec2;
    fn set_scale(&mut self, scale: Vec2);
}

/// Builder that adds transforms to an owner relative to a moving start time
pub struct Sequence<'a, T> {
    owner: &'a mut Transformable<T>,
    start_time: f64,
    end_time: f64,
}

impl<'a, T: 'static> Sequence<'a, T> {
    pub(crate) fn new(owner: &'a mut Transformable<T>, delay: f64) -> Self {
        let start_time = owner.current_time() + delay;
        Self {
            owner,
            start_time,
            end_time: start_time,
        }
    }

    /// Time the next transform will start at
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Latest end time of everything declared so far
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Push the start of following transforms back by `duration`
    pub fn delay(mut self, duration: f64) -> Self {
        self.start_time += duration;
        self.end_time = self.end_time.max(self.start_time);
        self
    }

    /// Start following transforms once every transform declared so far
    /// has ended
    pub fn then(mut self) -> Self {
        self.start_time = self.end_time;
        self
    }

    /// Add a transform of any member towards `end`
    pub fn transform_to<V: Interpolate>(
        mut self,
        member: &'static str,
        get: fn(&T) -> V,
        set: fn(&mut T, V),
        end: V,
        duration: f64,
        easing: Easing,
    ) -> Self {
        let transform = Transform::new(member, self.start_time, duration, easing, get, set, end);
        self.end_time = self.end_time.max(transform.end_time());
        self.owner.add_transform(transform);
        self
    }
}

impl<'a, T: Fadeable + 'static> Sequence<'a, T> {
    pub fn fade_to(self, alpha: f32, duration: f64, easing: Easing) -> Self {
        self.transform_to("alpha", T::alpha, T::set_alpha, alpha, duration, easing)
    }

    pub fn fade_in(self, duration: f64, easing: Easing) -> Self {
        self.fade_to(1.0, duration, easing)
    }

    pub fn fade_out(self, duration: f64, easing: Easing) -> Self {
        self.fade_to(0.0, duration, easing)
    }
}

impl<'a, T: Movable + 'static> Sequence<'a, T> {
    pub fn move_to(self, position: Vec2, duration: f64, easing: Easing) -> Self {
        self.transform_to(
            "position",
            T::position,
            T::set_position,
            position,
            duration,
            easing,
        )
    }
}

impl<'a, T: Scalable + 'static> Sequence<'a, T> {
    pub fn scale_to(self, scale: Vec2, duration: f64, easing: Easing) -> Self {
        self.transform_to("scale", T::scale, T::set_scale, scale, duration, easing)
    }
}
