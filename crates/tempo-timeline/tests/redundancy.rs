use pretty_assertions::assert_eq;
use tempo_timeline::{Accuracy, AccuracyEvent, EventContainer, Score, ScoreEvent};

#[test]
fn test_tick_events_replace_each_other() {
    let mut scores = EventContainer::new();
    scores.add(ScoreEvent::tick(100.0, Score(10)));
    scores.add(ScoreEvent::tick(100.0, Score(20)));

    assert_eq!(scores.len(), 1);
    assert_eq!(scores.event_at(100.0).unwrap().value, Score(20));
}

#[test]
fn test_synced_events_always_grow_the_container() {
    let mut scores = EventContainer::new();
    scores.add(ScoreEvent::tick(100.0, Score(10)));

    for (i, score) in [11, 12, 13].into_iter().enumerate() {
        let before = scores.len();
        scores.add(ScoreEvent::synced(100.0, Score(score), i as i32));
        assert_eq!(scores.len(), before + 1);
    }

    // The last inserted event wins the tie
    assert_eq!(scores.event_at(100.0).unwrap().value, Score(13));
}

#[test]
fn test_tick_after_synced_keeps_both() {
    let mut accuracy = EventContainer::new();
    accuracy.add(AccuracyEvent::synced(50.0, Accuracy(0.5), 2));
    accuracy.add(AccuracyEvent::tick(50.0, Accuracy(0.75)));

    assert_eq!(accuracy.len(), 2);
    assert_eq!(accuracy.event_at(50.0).unwrap().value, Accuracy(0.75));
}

#[test]
fn test_remove_only_matches_redundant_events() {
    let mut scores = EventContainer::new();
    scores.add(ScoreEvent::synced(10.0, Score(1), 0));

    assert!(!scores.remove(&ScoreEvent::tick(10.0, Score(1))));
    assert!(!scores.remove(&ScoreEvent::synced(10.0, Score(1), 0)));
    assert_eq!(scores.len(), 1);
}
