use pretty_assertions::assert_eq;
use tempo_test_utils::{init_test_logging, PacketBuilder};
use tempo_timeline::{
    Accuracy, BeatmapInfo, Combo, DifficultyOverrides, HitResult, Mods, PlayerId, Score,
    TimelineAggregator, TimelineError,
};

const MAP: BeatmapInfo = BeatmapInfo {
    object_count: 4,
    overall_difficulty: 5.0,
};

fn aggregator() -> TimelineAggregator {
    let mut aggregator = TimelineAggregator::default();
    aggregator.add_player(PlayerId(1), MAP, Mods::empty(), DifficultyOverrides::default());
    aggregator
}

#[test]
fn test_ingest_reports_unknown_player() {
    let mut aggregator = aggregator();
    let packet = PacketBuilder::at(100.0).encode();

    assert!(matches!(
        aggregator.ingest_packet(PlayerId(2), &packet),
        Err(TimelineError::UnknownPlayer(PlayerId(2)))
    ));
    assert!(!aggregator.process_packet(PlayerId(2), &packet));
}

#[test]
fn test_ingest_reports_decode_failure() {
    let mut aggregator = aggregator();
    let mut packet = PacketBuilder::at(100.0).encode();
    packet.push(0);

    assert!(matches!(
        aggregator.ingest_packet(PlayerId(1), &packet),
        Err(TimelineError::Protocol(_))
    ));
}

#[test]
fn test_late_packet_fills_in_history() {
    init_test_logging();
    let mut aggregator = aggregator();

    let first = PacketBuilder::at(1000.0)
        .synced(300, 1, 1.0)
        .snapshot(500.0, 300, 1, 1.0)
        .judgement(0, 500.0, HitResult::Great)
        .encode();
    let second = PacketBuilder::at(2000.0)
        .synced(400, 2, 0.5)
        .snapshot(1500.0, 400, 2, 0.5)
        .judgement(1, 1500.0, HitResult::Meh)
        .encode();
    aggregator.ingest_packet(PlayerId(1), &second).unwrap();
    aggregator.ingest_packet(PlayerId(1), &first).unwrap();

    let player = aggregator.player(PlayerId(1)).unwrap();
    assert_eq!(player.score_at(600.0).value, Score(300));
    assert_eq!(player.combo_at(1600.0).value, Combo(2));
    assert_eq!(player.judgement_at(1600.0).object_index, 1);
    assert_eq!(player.judgement(0).map(|j| j.running_score), Some(Score(300)));
    assert_eq!(player.highest_judged_index(), 1);
    assert_eq!(player.latest_known_server_time(), 2000.0);
    assert!(player.is_available_at(1500.0));
    assert_eq!(player.accuracy_at(2500.0).value, Accuracy(0.5));

    let synced: Vec<f64> = player.synced_accuracies().iter().map(|e| e.time).collect();
    assert_eq!(synced, vec![2000.0]);
}

#[test]
fn test_judgement_carries_ticks() {
    let mut aggregator = aggregator();
    let packet = PacketBuilder::at(1000.0)
        .judgement_with_ticks(2, 800.0, HitResult::Good, &[true, false, true])
        .encode();
    aggregator.ingest_packet(PlayerId(1), &packet).unwrap();

    let judged = aggregator.player(PlayerId(1)).unwrap().judgement(2).unwrap();
    assert_eq!(judged.tickset.get(0), Some(true));
    assert_eq!(judged.tickset.get(1), Some(false));
    assert_eq!(judged.tickset.hit_count(), 2);
}
