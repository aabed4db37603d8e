//! Rewind-safe transform scheduling
//!
//! A [`Transformable`] owns a target value and a set of per-member
//! [`TransformTracker`]s. Each tracker keeps its transforms sorted by start
//! time and replays them for any query time, including times earlier than
//! the previous update.
//!
//! Trackers cache cursor state between updates and must only be driven from
//! the thread that owns them.

pub mod clock;
pub mod easing;
pub mod interpolate;
pub mod sequence;
pub mod tracker;
pub mod transform;
pub mod transformable;

pub use clock::{Clock, ClockSource, MediaPosition};
pub use easing::Easing;
pub use interpolate::Interpolate;
pub use sequence::{Fadeable, Movable, Scalable, Sequence};
pub use tracker::TransformTracker;
pub use transform::Transform;
pub use transformable::Transformable;
