//! Retain Scheduling Benchmarks
//!
//! Benchmarks for the scheduling hot paths using Criterion.
//! Run with: cargo bench -p retain-core

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use retain_core::{
    preview_intervals, schedule, select_due_cards, CardState, DueFilter, Grade, Queue,
    SchedulerKind, State,
};

fn review_card(i: usize) -> CardState {
    let now = Utc.timestamp_millis_opt(0).unwrap();
    let mut card = CardState::new(format!("card-{i}"), format!("deck-{}", i % 5), now);
    card.state = State::Review;
    card.queue = Queue::Review;
    card.interval = 1.0 + (i % 60) as f64;
    card.ease_factor = 2500 - (i % 12) as i32 * 50;
    card.stability = 1.0 + (i % 40) as f64 * 0.7;
    card.difficulty = 1.0 + (i % 9) as f64;
    card.reps = (i % 20) as i32;
    card.last_review = Some(now - Duration::days((i % 30) as i64));
    card.due = now - Duration::hours(i as i64 % 72);
    card
}

fn bench_schedule(c: &mut Criterion) {
    let now = Utc.timestamp_millis_opt(0).unwrap();
    let card = review_card(7);

    c.bench_function("schedule_sm2", |b| {
        b.iter(|| {
            for grade in Grade::ALL {
                black_box(schedule(&card, grade, SchedulerKind::Classical, now).unwrap());
            }
        })
    });

    c.bench_function("schedule_fsrs_v5", |b| {
        b.iter(|| {
            for grade in Grade::ALL {
                black_box(schedule(&card, grade, SchedulerKind::MemoryModelV5, now).unwrap());
            }
        })
    });

    c.bench_function("preview_fsrs_v5", |b| {
        b.iter(|| {
            black_box(preview_intervals(&card, SchedulerKind::MemoryModelV5, now).unwrap());
        })
    });
}

fn bench_select_due_cards(c: &mut Criterion) {
    let now = Utc.timestamp_millis_opt(0).unwrap();
    let cards: Vec<CardState> = (0..10_000).map(review_card).collect();
    let filter = DueFilter::default();

    c.bench_function("select_due_10k", |b| {
        b.iter(|| {
            black_box(select_due_cards(&cards, &filter, now));
        })
    });
}

criterion_group!(benches, bench_schedule, bench_select_due_cards);
criterion_main!(benches);
