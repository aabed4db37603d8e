//! Multi-player timeline aggregation
//!
//! Gates playback on every tracked player having data for the clock time,
//! and exposes the time range covered by all of them.

use crate::mods::{BeatmapInfo, DifficultyOverrides, Mods};
use crate::player::{PlayerTimeline, TimelineConfig};
use crate::{PlayerId, TimelineError};
use std::collections::{BTreeMap, BTreeSet};
use tempo_protocol::Packet;
use tracing::{debug, info, warn};

pub struct TimelineAggregator {
    config: TimelineConfig,
    players: BTreeMap<PlayerId, PlayerTimeline>,
    /// Players excluded from availability gating and time bounds
    ignore_data_presence: BTreeSet<PlayerId>,
    /// When set, an unavailable player is treated as available until its
    /// next packet instead of blocking playback
    tolerate_stalls: bool,
}

impl Default for TimelineAggregator {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}

impl TimelineAggregator {
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            config,
            players: BTreeMap::new(),
            ignore_data_presence: BTreeSet::new(),
            tolerate_stalls: false,
        }
    }

    /// Start tracking a player. Returns false if the player is already tracked.
    pub fn add_player(
        &mut self,
        player_id: PlayerId,
        beatmap: BeatmapInfo,
        mods: Mods,
        overrides: DifficultyOverrides,
    ) -> bool {
        if self.players.contains_key(&player_id) {
            return false;
        }

        let timeline = PlayerTimeline::new(player_id, beatmap, mods, overrides, &self.config);
        self.players.insert(player_id, timeline);
        info!(
            "Tracking player {} ({} objects, mods {:?})",
            player_id, beatmap.object_count, mods
        );
        true
    }

    /// Stop tracking a player. Returns false if the player was not tracked.
    pub fn remove_player(&mut self, player_id: PlayerId) -> bool {
        self.ignore_data_presence.remove(&player_id);
        let removed = self.players.remove(&player_id).is_some();
        if removed {
            info!("Stopped tracking player {}", player_id);
        }
        removed
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.players.contains_key(&player_id)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerTimeline> {
        self.players.get(&player_id)
    }

    pub fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut PlayerTimeline> {
        self.players.get_mut(&player_id)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerTimeline> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Clear every player's timeline
    pub fn reset(&mut self) {
        self.players.values_mut().for_each(PlayerTimeline::reset);
    }

    /// Clear one player's timeline. Returns false if the player is unknown.
    pub fn reset_player(&mut self, player_id: PlayerId) -> bool {
        match self.players.get_mut(&player_id) {
            Some(player) => {
                player.reset();
                true
            }
            None => false,
        }
    }

    pub fn set_ignore_data_presence(&mut self, player_id: PlayerId, ignore: bool) {
        if ignore {
            self.ignore_data_presence.insert(player_id);
        } else {
            self.ignore_data_presence.remove(&player_id);
        }
    }

    pub fn is_ignoring_data_presence(&self, player_id: PlayerId) -> bool {
        self.ignore_data_presence.contains(&player_id)
    }

    pub fn set_tolerate_stalls(&mut self, tolerate: bool) {
        self.tolerate_stalls = tolerate;
    }

    pub fn tolerates_stalls(&self) -> bool {
        self.tolerate_stalls
    }

    /// Whether every considered player has data up to `time`
    pub fn is_available_at(&mut self, time: f64) -> bool {
        for (player_id, player) in self.players.iter_mut() {
            if self.ignore_data_presence.contains(player_id) || player.is_available_at(time) {
                continue;
            }
            if !self.tolerate_stalls {
                return false;
            }

            warn!(
                "Player {} stalled at {:.1}ms, treating as available",
                player_id,
                player.latest_known_server_time()
            );
            player.force_available();
        }
        true
    }

    /// Earliest event time across considered players
    pub fn earliest_event_time(&self) -> Option<f64> {
        self.considered()
            .filter_map(PlayerTimeline::earliest_event_time)
            .reduce(f64::min)
    }

    /// Latest time every considered player has events up to
    pub fn latest_event_time(&self) -> Option<f64> {
        self.considered()
            .filter_map(PlayerTimeline::latest_event_time)
            .reduce(f64::min)
    }

    /// Decode and apply a packet for one player
    pub fn ingest_packet(&mut self, player_id: PlayerId, buf: &[u8]) -> Result<(), TimelineError> {
        let player = self
            .players
            .get_mut(&player_id)
            .ok_or(TimelineError::UnknownPlayer(player_id))?;
        let packet = Packet::decode(buf)?;
        player.apply_packet(&packet)
    }

    /// Packet entry point for the transport. Failures are logged and the
    /// packet is dropped.
    pub fn process_packet(&mut self, player_id: PlayerId, buf: &[u8]) -> bool {
        match self.ingest_packet(player_id, buf) {
            Ok(()) => true,
            Err(TimelineError::UnknownPlayer(id)) => {
                debug!("Ignoring packet for untracked player {}", id);
                false
            }
            Err(e) => {
                warn!("Dropping packet for player {}: {}", player_id, e);
                false
            }
        }
    }

    fn considered(&self) -> impl Iterator<Item = &PlayerTimeline> {
        self.players
            .iter()
            .filter(|(id, _)| !self.ignore_data_presence.contains(*id))
            .map(|(_, player)| player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: BeatmapInfo = BeatmapInfo {
        object_count: 8,
        overall_difficulty: 5.0,
    };

    #[test]
    fn test_add_and_remove_are_idempotent() {
        let mut aggregator = TimelineAggregator::default();
        assert!(aggregator.add_player(PlayerId(1), MAP, Mods::empty(), Default::default()));
        assert!(!aggregator.add_player(PlayerId(1), MAP, Mods::HIDDEN, Default::default()));
        assert_eq!(aggregator.player(PlayerId(1)).unwrap().mods(), Mods::empty());

        assert!(aggregator.remove_player(PlayerId(1)));
        assert!(!aggregator.remove_player(PlayerId(1)));
        assert!(aggregator.is_empty());
    }

    #[test]
    fn test_empty_aggregator_is_available() {
        let mut aggregator = TimelineAggregator::default();
        assert!(aggregator.is_available_at(1e9));
        assert_eq!(aggregator.earliest_event_time(), None);
    }
}
