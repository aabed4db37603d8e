//! Timeline for a single player
//!
//! Owns one container per event kind plus a cursor and click container per
//! touch point. The containers are created when the player starts a round
//! and cleared whenever the round restarts or the player's mods change, so
//! events from a previous attempt never leak into the next one.

use crate::container::EventContainer;
use crate::event::{
    AccuracyEvent, ClickEvent, ComboEvent, CursorEvent, JudgementEvent, ScoreEvent, Sentinel,
};
use crate::indexed::IndexOrderedContainer;
use crate::mods::{BeatmapInfo, DifficultyOverrides, HitWindows, Mods};
use crate::objects::ObjectContainer;
use crate::PlayerId;
use tempo_protocol::MAX_CURSOR_STREAMS;
use tracing::info;

/// Configuration for player timelines
#[derive(Debug, Clone)]
pub struct TimelineConfig {
    /// Number of simultaneous touch points tracked per player
    pub touch_points: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            touch_points: MAX_CURSOR_STREAMS,
        }
    }
}

pub struct PlayerTimeline {
    pub(crate) player_id: PlayerId,
    beatmap: BeatmapInfo,
    mods: Mods,
    overrides: DifficultyOverrides,
    hit_windows: HitWindows,

    pub(crate) cursors: Vec<EventContainer<CursorEvent>>,
    pub(crate) clicks: Vec<EventContainer<ClickEvent>>,
    pub(crate) objects: ObjectContainer,
    pub(crate) score: EventContainer<ScoreEvent>,
    pub(crate) combo: EventContainer<ComboEvent>,
    pub(crate) accuracy: EventContainer<AccuracyEvent>,
    /// Synced accuracy, ordered by the object index it was sent with
    pub(crate) synced_accuracy: IndexOrderedContainer<AccuracyEvent>,

    /// Highest elapsed time carried by any packet so far
    pub(crate) latest_known_server_time: f64,
    /// Set by the aggregator's stall tolerance, cleared by the next packet
    pub(crate) stalled: bool,
    /// Highest object index judged so far, -1 before the first judgement
    pub(crate) highest_judged_index: i32,
}

impl PlayerTimeline {
    pub fn new(
        player_id: PlayerId,
        beatmap: BeatmapInfo,
        mods: Mods,
        overrides: DifficultyOverrides,
        config: &TimelineConfig,
    ) -> Self {
        Self {
            player_id,
            beatmap,
            mods,
            overrides,
            hit_windows: HitWindows::for_player(&beatmap, mods, &overrides),
            cursors: (0..config.touch_points).map(|_| EventContainer::new()).collect(),
            clicks: (0..config.touch_points).map(|_| EventContainer::new()).collect(),
            objects: ObjectContainer::new(beatmap.object_count),
            score: EventContainer::new(),
            combo: EventContainer::new(),
            accuracy: EventContainer::new(),
            synced_accuracy: IndexOrderedContainer::new(),
            latest_known_server_time: f64::NEG_INFINITY,
            stalled: false,
            highest_judged_index: -1,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn beatmap(&self) -> &BeatmapInfo {
        &self.beatmap
    }

    pub fn mods(&self) -> Mods {
        self.mods
    }

    pub fn overrides(&self) -> &DifficultyOverrides {
        &self.overrides
    }

    pub fn hit_windows(&self) -> &HitWindows {
        &self.hit_windows
    }

    pub fn touch_points(&self) -> usize {
        self.cursors.len()
    }

    /// Switch to new mods/overrides. Clears the timeline and returns true
    /// only if something actually changed.
    pub fn apply_mods(&mut self, mods: Mods, overrides: DifficultyOverrides) -> bool {
        if mods == self.mods && overrides == self.overrides {
            return false;
        }

        self.mods = mods;
        self.overrides = overrides;
        self.hit_windows = HitWindows::for_player(&self.beatmap, mods, &overrides);
        self.reset();
        true
    }

    /// Drop every event and the server time high-water mark
    pub fn reset(&mut self) {
        self.cursors.iter_mut().for_each(EventContainer::clear);
        self.clicks.iter_mut().for_each(EventContainer::clear);
        self.objects.clear();
        self.score.clear();
        self.combo.clear();
        self.accuracy.clear();
        self.synced_accuracy.clear();
        self.latest_known_server_time = f64::NEG_INFINITY;
        self.stalled = false;
        self.highest_judged_index = -1;

        info!("Reset timeline for player {}", self.player_id);
    }

    pub fn latest_known_server_time(&self) -> f64 {
        self.latest_known_server_time
    }

    /// Treat the player as permanently available until the next packet
    pub(crate) fn force_available(&mut self) {
        self.stalled = true;
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    pub fn is_available_at(&self, time: f64) -> bool {
        self.stalled || time <= self.latest_known_server_time
    }

    /// Earliest event time. Cursor data is only consulted when none of the
    /// score, combo, accuracy or judgement timelines has any events.
    pub fn earliest_event_time(&self) -> Option<f64> {
        let primary = [
            self.score.earliest_event_time(),
            self.combo.earliest_event_time(),
            self.accuracy.earliest_event_time(),
            self.synced_accuracy.earliest_event_time(),
            self.objects.earliest_event_time(),
        ];
        min_of(primary).or_else(|| {
            min_of(
                self.cursors
                    .iter()
                    .map(EventContainer::earliest_event_time)
                    .chain(self.clicks.iter().map(EventContainer::earliest_event_time)),
            )
        })
    }

    /// Latest event time, with the same cursor fallback as
    /// [`earliest_event_time`](Self::earliest_event_time)
    pub fn latest_event_time(&self) -> Option<f64> {
        let primary = [
            self.score.latest_event_time(),
            self.combo.latest_event_time(),
            self.accuracy.latest_event_time(),
            self.synced_accuracy.latest_event_time(),
            self.objects.latest_event_time(),
        ];
        max_of(primary).or_else(|| {
            max_of(
                self.cursors
                    .iter()
                    .map(EventContainer::latest_event_time)
                    .chain(self.clicks.iter().map(EventContainer::latest_event_time)),
            )
        })
    }

    pub fn score_at(&self, time: f64) -> &ScoreEvent {
        self.score.event_at_or_default(time)
    }

    pub fn combo_at(&self, time: f64) -> &ComboEvent {
        self.combo.event_at_or_default(time)
    }

    /// Accuracy at `time`, preferring whichever of the tick and synced
    /// accuracy timelines reported last. Synced wins ties.
    pub fn accuracy_at(&self, time: f64) -> &AccuracyEvent {
        match (
            self.accuracy.event_at(time),
            self.synced_accuracy.event_at(time),
        ) {
            (Some(tick), Some(synced)) if tick.time > synced.time => tick,
            (_, Some(synced)) => synced,
            (Some(tick), None) => tick,
            (None, None) => self.accuracy.sentinel(),
        }
    }

    /// Synced accuracy as of the given object index
    pub fn accuracy_at_object(&self, object_index: i32) -> Option<&AccuracyEvent> {
        self.synced_accuracy.event_for_index(object_index)
    }

    pub fn judgement_at(&self, time: f64) -> &JudgementEvent {
        self.objects.event_at_or_default(time)
    }

    pub fn judgement(&self, object_index: i32) -> Option<&JudgementEvent> {
        self.objects.get(object_index)
    }

    /// Cursor state of a touch point at `time`; out-of-range points get the
    /// sentinel
    pub fn cursor_at(&self, point: usize, time: f64) -> CursorEvent {
        self.cursors
            .get(point)
            .map(|c| *c.event_at_or_default(time))
            .unwrap_or_else(CursorEvent::sentinel)
    }

    pub fn click_at(&self, point: usize, time: f64) -> Option<&ClickEvent> {
        self.clicks.get(point)?.event_at(time)
    }

    pub fn miss_count(&self) -> usize {
        self.objects.miss_count()
    }

    pub fn highest_judged_index(&self) -> i32 {
        self.highest_judged_index
    }

    pub fn objects(&self) -> &ObjectContainer {
        &self.objects
    }

    pub fn cursors(&self, point: usize) -> Option<&EventContainer<CursorEvent>> {
        self.cursors.get(point)
    }

    pub fn clicks(&self, point: usize) -> Option<&EventContainer<ClickEvent>> {
        self.clicks.get(point)
    }

    pub fn scores(&self) -> &EventContainer<ScoreEvent> {
        &self.score
    }

    pub fn combos(&self) -> &EventContainer<ComboEvent> {
        &self.combo
    }

    pub fn accuracies(&self) -> &EventContainer<AccuracyEvent> {
        &self.accuracy
    }

    pub fn synced_accuracies(&self) -> &IndexOrderedContainer<AccuracyEvent> {
        &self.synced_accuracy
    }
}

fn min_of(times: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    times.into_iter().flatten().reduce(f64::min)
}

fn max_of(times: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    times.into_iter().flatten().reduce(f64::max)
}
