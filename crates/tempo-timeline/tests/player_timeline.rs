use pretty_assertions::assert_eq;
use tempo_test_utils::PacketBuilder;
use tempo_timeline::{
    Accuracy, BeatmapInfo, Combo, DifficultyOverrides, HitResult, Mods, MovementKind, PlayerId,
    PlayerTimeline, Score, TimelineConfig,
};

fn timeline() -> PlayerTimeline {
    PlayerTimeline::new(
        PlayerId(3),
        BeatmapInfo {
            object_count: 8,
            overall_difficulty: 5.0,
        },
        Mods::empty(),
        DifficultyOverrides::default(),
        &TimelineConfig::default(),
    )
}

#[test]
fn test_queries_answer_for_any_clock_position() {
    let mut player = timeline();
    player
        .apply_packet(
            &PacketBuilder::at(1000.0)
                .synced(600, 2, 1.0)
                .snapshot(250.0, 300, 1, 1.0)
                .snapshot(750.0, 600, 2, 1.0)
                .judgement(0, 250.0, HitResult::Great)
                .judgement(1, 750.0, HitResult::Great)
                .build(),
        )
        .unwrap();
    player
        .apply_packet(
            &PacketBuilder::at(2000.0)
                .synced(650, 0, 0.9)
                .snapshot(1500.0, 650, 0, 0.9)
                .judgement(2, 1500.0, HitResult::Miss)
                .build(),
        )
        .unwrap();

    // Rewinding is just another query
    for time in [1800.0, 100.0, 800.0, 260.0] {
        let expected_score = match time {
            t if t < 250.0 => 0,
            t if t < 750.0 => 300,
            t if t < 1500.0 => 600,
            _ => 650,
        };
        assert_eq!(player.score_at(time).value, Score(expected_score));
    }

    assert_eq!(player.combo_at(1600.0).value, Combo(0));
    assert_eq!(player.judgement_at(800.0).object_index, 1);
    assert_eq!(player.judgement_at(0.0).result, HitResult::Miss);
    assert_eq!(player.miss_count(), 1);
    assert_eq!(player.highest_judged_index(), 2);
    assert_eq!(player.accuracy_at_object(2).map(|e| e.value), Some(Accuracy(0.9f32 as f64)));
    assert_eq!(player.earliest_event_time(), Some(250.0));
    assert_eq!(player.latest_event_time(), Some(2000.0));
    assert!(player.is_available_at(2000.0));
    assert!(!player.is_available_at(2000.5));
}

#[test]
fn test_cursor_and_click_streams() {
    let mut player = timeline();
    player
        .apply_packet(
            &PacketBuilder::at(500.0)
                .cursor(0, 10, MovementKind::Down, 1.0, 2.0)
                .cursor(0, 20, MovementKind::Move, 3.0, 4.0)
                .cursor(0, 30, MovementKind::Up, 0.0, 0.0)
                .cursor(1, 25, MovementKind::Down, 9.0, 9.0)
                .build(),
        )
        .unwrap();

    let cursor = player.cursor_at(0, 25.0);
    assert_eq!(cursor.kind, MovementKind::Move);
    assert_eq!(cursor.position.map(|p| p.to_array()), Some([3.0, 4.0]));
    assert_eq!(player.cursor_at(0, 35.0).position, None);
    assert_eq!(player.click_at(0, 100.0).map(|c| c.time), Some(10.0));
    assert_eq!(player.click_at(1, 24.0), None);
    assert_eq!(player.clicks(1).unwrap().len(), 1);
    assert_eq!(player.cursor_at(0, 5.0).time, f64::NEG_INFINITY);
}

#[test]
fn test_synced_values_sit_at_packet_time() {
    let mut player = timeline();
    player
        .apply_packet(&PacketBuilder::at(1000.0).synced(1234, 7, 0.5).build())
        .unwrap();

    assert_eq!(player.score_at(999.0).value, Score(0));
    let synced = player.score_at(1000.0);
    assert!(synced.is_synced());
    assert_eq!(synced.value, Score(1234));
    assert_eq!(player.accuracy_at(1000.0).value, Accuracy(0.5));
    assert_eq!(player.synced_accuracies().len(), 1);
}

#[test]
fn test_too_many_touch_points() {
    let mut player = PlayerTimeline::new(
        PlayerId(1),
        BeatmapInfo {
            object_count: 1,
            overall_difficulty: 5.0,
        },
        Mods::empty(),
        DifficultyOverrides::default(),
        &TimelineConfig { touch_points: 1 },
    );

    let packet = PacketBuilder::at(10.0)
        .cursor(1, 5, MovementKind::Down, 0.0, 0.0)
        .build();
    assert!(player.apply_packet(&packet).is_err());
    assert_eq!(player.touch_points(), 1);
}
