//! Time sources for transform playback

use std::cell::Cell;
use std::rc::Rc;

/// Manually driven clock
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    current_time: f64,
    elapsed_frame_time: f64,
}

impl Clock {
    pub fn new(current_time: f64) -> Self {
        Self {
            current_time,
            elapsed_frame_time: 0.0,
        }
    }

    pub fn update(&mut self, time: f64) {
        self.elapsed_frame_time = time - self.current_time;
        self.current_time = time;
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn elapsed_frame_time(&self) -> f64 {
        self.elapsed_frame_time
    }

    pub fn is_rewinding(&self) -> bool {
        self.elapsed_frame_time < 0.0
    }
}

/// Playback position shared with a media element
///
/// The media side writes the position, every owner holding a clone reads it.
#[derive(Debug, Clone, Default)]
pub struct MediaPosition(Rc<Cell<f64>>);

impl MediaPosition {
    pub fn new(position: f64) -> Self {
        Self(Rc::new(Cell::new(position)))
    }

    pub fn set(&self, position: f64) {
        self.0.set(position);
    }

    pub fn get(&self) -> f64 {
        self.0.get()
    }
}

/// Where an owner reads its current time from
#[derive(Debug, Clone)]
pub enum ClockSource {
    Manual(Clock),
    Media(MediaPosition),
}

impl Default for ClockSource {
    fn default() -> Self {
        ClockSource::Manual(Clock::default())
    }
}

impl ClockSource {
    pub fn current_time(&self) -> f64 {
        match self {
            ClockSource::Manual(clock) => clock.current_time(),
            ClockSource::Media(media) => media.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_tracks_rewinds() {
        let mut clock = Clock::default();
        clock.update(100.0);
        assert_eq!(clock.elapsed_frame_time(), 100.0);
        assert!(!clock.is_rewinding());

        clock.update(40.0);
        assert_eq!(clock.current_time(), 40.0);
        assert_eq!(clock.elapsed_frame_time(), -60.0);
        assert!(clock.is_rewinding());
    }

    #[test]
    fn test_media_position_is_shared() {
        let media = MediaPosition::new(0.0);
        let source = ClockSource::Media(media.clone());
        media.set(1234.5);
        assert_eq!(source.current_time(), 1234.5);
    }
}
