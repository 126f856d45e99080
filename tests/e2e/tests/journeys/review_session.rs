//! Journey: a full study session
//!
//! Build the queue, grade the front card, log it, advance, and undo —
//! the same loop the study page drives, minus persistence.

use chrono::Duration;
use retain_core::{
    preview_intervals, record_grading, schedule, select_due_cards, undo_grading, DueFilter, Grade,
    Queue, SchedulerKind, State,
};
use retain_e2e_tests::fixtures::{due_review_card, epoch, lapsed_card, new_card};

#[test]
fn queue_grade_log_and_advance() {
    let now = epoch();
    let cards = vec![
        due_review_card("r1", "deck-1", 10.0, 5),
        new_card("n1", "deck-1"),
        lapsed_card("l1", "deck-1"),
    ];

    let queue = select_due_cards(&cards, &DueFilter::default(), now);
    let ids: Vec<&str> = queue.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["l1", "n1", "r1"]);

    // The UI shows button previews before the user commits a grade.
    let front = &queue[0];
    let preview = preview_intervals(front, SchedulerKind::Classical, now).unwrap();
    assert_eq!(preview.again, "10m");
    assert_eq!(preview.good, "1d");

    // Grade the relearning card Good: it graduates.
    let result = schedule(front, Grade::Good, SchedulerKind::Classical, now).unwrap();
    let entry = record_grading(front, Grade::Good, &result, now);
    let updated = result.apply_to(front, Grade::Good, now);
    assert_eq!(updated.state, State::Review);
    assert_eq!(updated.queue, Queue::Review);
    assert_eq!(updated.reps, front.reps + 1);
    assert_eq!(updated.due, now + Duration::days(1));

    // A re-built queue no longer contains the graduated card.
    let mut after: Vec<_> = queue[1..].to_vec();
    after.push(updated.clone());
    let rebuilt = select_due_cards(&after, &DueFilter::default(), now);
    assert!(rebuilt.iter().all(|c| c.id != "l1"));

    // Undo the grading: the exact pre-grading card comes back.
    let restored = undo_grading(&entry);
    assert_eq!(&restored, front);
    let undone = select_due_cards(
        &[restored, after[0].clone(), after[1].clone()],
        &DueFilter::default(),
        now,
    );
    assert_eq!(undone[0].id, "l1");
}

#[test]
fn lapse_flow_keeps_audit_and_counters_consistent() {
    let now = epoch();
    let card = due_review_card("r1", "deck-1", 30.0, 1);

    let result = schedule(&card, Grade::Again, SchedulerKind::MemoryModelV5, now).unwrap();
    let entry = record_grading(&card, Grade::Again, &result, now);
    let updated = result.apply_to(&card, Grade::Again, now);

    assert_eq!(updated.state, State::Relearning);
    assert_eq!(updated.queue, Queue::Learning);
    assert_eq!(updated.lapses, card.lapses + 1);
    assert!(updated.stability < card.stability);

    assert_eq!(entry.prev_state, State::Review);
    assert_eq!(entry.new_state, State::Relearning);
    assert_eq!(entry.grade, Grade::Again);

    // The relearning card is due within minutes and leads the next queue.
    let later = now + Duration::minutes(6);
    let queue = select_due_cards(&[updated], &DueFilter::default(), later);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].state, State::Relearning);
}

#[test]
fn multi_deck_session_respects_scope_and_caps() {
    let now = epoch();
    let mut cards: Vec<_> = (0..25)
        .map(|i| new_card(&format!("n{i}"), "deck-a"))
        .collect();
    cards.push(due_review_card("r-a", "deck-a", 5.0, 2));
    cards.push(due_review_card("r-b", "deck-b", 5.0, 2));

    let filter = DueFilter {
        scope: retain_core::DeckScope::Deck("deck-a".into()),
        ..DueFilter::default()
    };
    let queue = select_due_cards(&cards, &filter, now);

    // 20 new (daily cap) + 1 due review; deck-b never appears.
    assert_eq!(queue.len(), 21);
    assert!(queue.iter().all(|c| c.deck_id == "deck-a"));
    assert_eq!(queue.iter().filter(|c| c.state == State::New).count(), 20);
}
