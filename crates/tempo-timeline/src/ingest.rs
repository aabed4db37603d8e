//! Applying decoded packets to a player timeline
//!
//! A packet is validated against the timeline in full before anything is
//! inserted, so a rejected packet leaves the timeline untouched.

use crate::event::{
    Accuracy, AccuracyEvent, ClickEvent, Combo, ComboEvent, CursorEvent, JudgementEvent, Score,
    ScoreEvent,
};
use crate::player::PlayerTimeline;
use crate::TimelineError;
use glam::Vec2;
use tempo_protocol::{MovementKind, Packet};
use tracing::debug;

impl PlayerTimeline {
    /// Check that every part of the packet fits this timeline
    pub fn validate_packet(&self, packet: &Packet) -> Result<(), TimelineError> {
        if packet.cursor_streams.len() > self.touch_points() {
            return Err(TimelineError::TooManyTouchPoints {
                got: packet.cursor_streams.len(),
                max: self.touch_points(),
            });
        }

        let object_count = self.objects.object_count();
        if let Some(bad) = packet
            .judgements
            .iter()
            .find(|j| j.object_index < 0 || j.object_index as usize >= object_count)
        {
            return Err(TimelineError::ObjectIndexOutOfRange {
                index: bad.object_index,
                count: object_count,
            });
        }

        Ok(())
    }

    /// Insert every event carried by the packet and raise the server time
    /// high-water mark to the packet's elapsed time
    pub fn apply_packet(&mut self, packet: &Packet) -> Result<(), TimelineError> {
        self.validate_packet(packet)?;

        for (point, stream) in packet.cursor_streams.iter().enumerate() {
            for sample in stream {
                let time = f64::from(sample.time_ms);
                self.cursors[point].add(CursorEvent {
                    time,
                    position: sample.position.map(Vec2::from_array),
                    kind: sample.kind,
                });
                if sample.kind == MovementKind::Down {
                    self.clicks[point].add(ClickEvent { time });
                }
            }
        }

        for snapshot in &packet.snapshots {
            let time = f64::from(snapshot.time_ms);
            self.score.add(ScoreEvent::tick(time, Score(snapshot.score)));
            self.combo.add(ComboEvent::tick(time, Combo(snapshot.combo)));
            self.accuracy
                .add(AccuracyEvent::tick(time, Accuracy(f64::from(snapshot.accuracy))));
        }

        if let Some(highest) = packet.judgements.iter().map(|j| j.object_index).max() {
            self.highest_judged_index = self.highest_judged_index.max(highest);
        }

        let elapsed = packet.elapsed_ms();
        let object_index = self.highest_judged_index;
        self.score
            .add(ScoreEvent::synced(elapsed, Score(packet.synced.score), object_index));
        self.combo
            .add(ComboEvent::synced(elapsed, Combo(packet.synced.combo), object_index));
        // Synced accuracy is ordered by object index, which must agree with time
        if self
            .synced_accuracy
            .latest_event_time()
            .map_or(true, |latest| elapsed >= latest)
        {
            self.synced_accuracy.add(AccuracyEvent::synced(
                elapsed,
                Accuracy(f64::from(packet.synced.accuracy)),
                object_index,
            ));
        } else {
            debug!(
                "Player {} dropped late synced accuracy at {:.1}ms",
                self.player_id, elapsed
            );
        }

        for record in &packet.judgements {
            let event = JudgementEvent {
                time: record.time_ms,
                object_index: record.object_index,
                accuracy_offset: record.accuracy_offset,
                tickset: record.tickset.clone(),
                result: record.result,
                running_score: self.score_at(record.time_ms).value,
                running_combo: self.combo_at(record.time_ms).value,
                running_accuracy: self.accuracy_at(record.time_ms).value,
            };
            self.objects.add(event)?;
        }

        self.latest_known_server_time = self.latest_known_server_time.max(elapsed);
        self.stalled = false;
        debug!(
            "Player {} latest known server time: {:.1}ms ({} judged, {} misses)",
            self.player_id,
            self.latest_known_server_time,
            self.objects.judged_count(),
            self.objects.miss_count()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mods::{BeatmapInfo, DifficultyOverrides, Mods};
    use crate::player::TimelineConfig;
    use crate::PlayerId;
    use tempo_protocol::{CursorSample, HitResult, JudgementRecord, SnapshotRecord, Tickset};

    fn timeline(object_count: usize) -> PlayerTimeline {
        PlayerTimeline::new(
            PlayerId(1),
            BeatmapInfo {
                object_count,
                overall_difficulty: 5.0,
            },
            Mods::empty(),
            DifficultyOverrides::default(),
            &TimelineConfig::default(),
        )
    }

    #[test]
    fn test_bad_object_index_leaves_timeline_untouched() {
        let mut player = timeline(2);
        let packet = Packet {
            elapsed_seconds: 1.0,
            cursor_streams: vec![vec![CursorSample {
                time_ms: 10,
                kind: MovementKind::Down,
                position: Some([1.0, 2.0]),
            }]],
            judgements: vec![JudgementRecord {
                object_index: 5,
                time_ms: 900.0,
                accuracy_offset: 0,
                tickset: Tickset::default(),
                result: HitResult::Great,
            }],
            ..Default::default()
        };

        assert!(player.apply_packet(&packet).is_err());
        assert!(player.cursors(0).unwrap().is_empty());
        assert!(player.scores().is_empty());
        assert!(!player.is_available_at(0.0));
    }

    #[test]
    fn test_running_totals_come_from_same_packet() {
        let mut player = timeline(4);
        let packet = Packet {
            elapsed_seconds: 1.0,
            judgements: vec![JudgementRecord {
                object_index: 0,
                time_ms: 500.0,
                accuracy_offset: 4,
                tickset: Tickset::default(),
                result: HitResult::Great,
            }],
            snapshots: vec![SnapshotRecord {
                time_ms: 500.0,
                score: 300,
                combo: 1,
                accuracy: 1.0,
            }],
            ..Default::default()
        };

        player.apply_packet(&packet).unwrap();
        let judged = player.judgement(0).unwrap();
        assert_eq!(judged.running_score, Score(300));
        assert_eq!(judged.running_combo, Combo(1));
        assert_eq!(judged.running_accuracy, Accuracy(1.0));
        assert_eq!(player.highest_judged_index(), 0);
        assert_eq!(player.latest_known_server_time(), 1000.0);
    }
}
