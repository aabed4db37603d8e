//! Counters that roll towards a player's value at the clock time

use tempo_timeline::{HitResult, PlayerTimeline};
use tempo_transform::{Easing, Transform, Transformable};

/// Strategy deciding what a counter shows
pub trait ValueSource {
    /// Value the counter should show at `time`
    fn sample(&self, player: &PlayerTimeline, time: f64) -> f64;

    fn format(&self, value: f64) -> String;

    /// Value shown before the first sample
    fn initial_value(&self) -> f64 {
        0.0
    }

    /// How long a change takes to roll in
    fn roll_duration(&self) -> f64 {
        500.0
    }

    fn easing(&self) -> Easing {
        Easing::OutQuad
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreSource;

impl ValueSource for ScoreSource {
    fn sample(&self, player: &PlayerTimeline, time: f64) -> f64 {
        f64::from(player.score_at(time).value.0)
    }

    fn format(&self, value: f64) -> String {
        format!("{:08}", value.round() as i64)
    }

    fn roll_duration(&self) -> f64 {
        1000.0
    }

    fn easing(&self) -> Easing {
        Easing::OutQuint
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ComboSource;

impl ValueSource for ComboSource {
    fn sample(&self, player: &PlayerTimeline, time: f64) -> f64 {
        f64::from(player.combo_at(time).value.0)
    }

    fn format(&self, value: f64) -> String {
        format!("{}x", value.round() as i64)
    }

    fn roll_duration(&self) -> f64 {
        20.0
    }

    fn easing(&self) -> Easing {
        Easing::None
    }
}

/// Accuracy as a percentage
#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracySource;

impl ValueSource for AccuracySource {
    fn sample(&self, player: &PlayerTimeline, time: f64) -> f64 {
        player.accuracy_at(time).value.0 * 100.0
    }

    fn format(&self, value: f64) -> String {
        format!("{value:.2}%")
    }

    fn initial_value(&self) -> f64 {
        100.0
    }

    fn roll_duration(&self) -> f64 {
        750.0
    }
}

/// Number of judgements with one result awarded by the clock time
#[derive(Debug, Clone, Copy)]
pub struct HitCountSource(pub HitResult);

impl ValueSource for HitCountSource {
    fn sample(&self, player: &PlayerTimeline, time: f64) -> f64 {
        player
            .objects()
            .iter()
            .filter(|j| j.result == self.0 && j.time <= time)
            .count() as f64
    }

    fn format(&self, value: f64) -> String {
        format!("{}", value.round() as i64)
    }

    fn roll_duration(&self) -> f64 {
        150.0
    }
}

#[derive(Debug, Default)]
struct CounterDisplay {
    value: f64,
}

/// Displayed number that animates towards its source's value
///
/// Each change of the sampled value starts a transform at the update time.
/// When the clock moves backwards the display is rewound first, and any
/// roll that started after the new time is discarded before the counter
/// re-targets.
pub struct RollingCounter<S> {
    source: S,
    display: Transformable<CounterDisplay>,
    /// Value each remaining roll heads towards, by start time
    targets: Vec<(f64, f64)>,
    last_update_time: f64,
}

impl<S: ValueSource> RollingCounter<S> {
    pub fn new(source: S) -> Self {
        Self {
            display: Transformable::new(CounterDisplay {
                value: source.initial_value(),
            }),
            targets: Vec::new(),
            last_update_time: f64::NEG_INFINITY,
            source,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn update(&mut self, player: &PlayerTimeline, time: f64) {
        self.display.update(time);

        if time < self.last_update_time {
            self.display.clear_transforms_after(time);
            let keep = self.targets.partition_point(|&(start, _)| start < time);
            self.targets.truncate(keep);
        }
        self.last_update_time = time;

        let sampled = self.source.sample(player, time);
        if sampled != self.target_value() {
            self.display.add_transform(Transform::new(
                "value",
                time,
                self.source.roll_duration(),
                self.source.easing(),
                |d: &CounterDisplay| d.value,
                |d: &mut CounterDisplay, value| d.value = value,
                sampled,
            ));
            self.targets.push((time, sampled));
            self.display.update(time);
        }
    }

    /// Value currently shown
    pub fn displayed_value(&self) -> f64 {
        self.display.target().value
    }

    /// Value the counter is rolling towards
    pub fn target_value(&self) -> f64 {
        self.targets
            .last()
            .map_or(self.source.initial_value(), |&(_, value)| value)
    }

    pub fn display_text(&self) -> String {
        self.source.format(self.displayed_value())
    }

    /// Whether a roll is still in progress
    pub fn is_rolling(&self) -> bool {
        self.displayed_value() != self.target_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_timeline::{BeatmapInfo, DifficultyOverrides, Mods, PlayerId, TimelineConfig};

    fn player() -> PlayerTimeline {
        PlayerTimeline::new(
            PlayerId(1),
            BeatmapInfo {
                object_count: 4,
                overall_difficulty: 5.0,
            },
            Mods::empty(),
            DifficultyOverrides::default(),
            &TimelineConfig::default(),
        )
    }

    #[test]
    fn test_idle_counter_shows_initial_value() {
        let mut counter = RollingCounter::new(ScoreSource);
        counter.update(&player(), 100.0);
        assert_eq!(counter.displayed_value(), 0.0);
        assert_eq!(counter.display_text(), "00000000");
        assert!(!counter.is_rolling());
    }

    #[test]
    fn test_formatting() {
        assert_eq!(ComboSource.format(12.4), "12x");
        assert_eq!(AccuracySource.format(98.766), "98.77%");
        assert_eq!(HitCountSource(HitResult::Great).format(3.0), "3");
    }
}
