use tempo_timeline::{
    Accuracy, Combo, HitResult, JudgementEvent, ObjectContainer, Score, TimelineError,
};
use tempo_timeline::event::Sentinel;

fn judgement(object_index: i32, time: f64, result: HitResult) -> JudgementEvent {
    JudgementEvent {
        time,
        object_index,
        result,
        running_score: Score(0),
        running_combo: Combo(0),
        running_accuracy: Accuracy(1.0),
        ..JudgementEvent::sentinel()
    }
}

#[test]
fn test_miss_counter_follows_replacements() {
    let mut objects = ObjectContainer::new(4);
    objects.add(judgement(0, 100.0, HitResult::Miss)).unwrap();
    objects.add(judgement(1, 200.0, HitResult::Miss)).unwrap();
    assert_eq!(objects.miss_count(), 2);

    let replaced = objects.add(judgement(1, 210.0, HitResult::Great)).unwrap();
    assert_eq!(replaced.map(|j| j.result), Some(HitResult::Miss));
    assert_eq!(objects.miss_count(), 1);
    assert_eq!(objects.judged_count(), 2);

    objects.remove(0);
    assert_eq!(objects.miss_count(), 0);
    assert_eq!(objects.judged_count(), 1);
}

#[test]
fn test_out_of_range_index_is_rejected() {
    let mut objects = ObjectContainer::new(2);
    assert!(matches!(
        objects.add(judgement(2, 0.0, HitResult::Great)),
        Err(TimelineError::ObjectIndexOutOfRange { index: 2, count: 2 })
    ));
    assert!(matches!(
        objects.add(judgement(-1, 0.0, HitResult::Great)),
        Err(TimelineError::ObjectIndexOutOfRange { index: -1, .. })
    ));
    assert!(objects.is_empty());
}

#[test]
fn test_sparse_lookup_by_time() {
    let mut objects = ObjectContainer::new(10);
    for (index, time) in [(0, 100.0), (3, 400.0), (4, 500.0), (8, 900.0)] {
        objects.add(judgement(index, time, HitResult::Great)).unwrap();
    }

    assert!(objects.event_at(99.0).is_none());
    assert_eq!(objects.event_at_or_default(99.0).object_index, -1);
    assert_eq!(objects.event_at(100.0).unwrap().object_index, 0);
    assert_eq!(objects.event_at(450.0).unwrap().object_index, 3);
    assert_eq!(objects.event_at(899.0).unwrap().object_index, 4);
    assert_eq!(objects.event_at(5000.0).unwrap().object_index, 8);
    assert_eq!(objects.earliest_event_time(), Some(100.0));
    assert_eq!(objects.latest_event_time(), Some(900.0));
}
