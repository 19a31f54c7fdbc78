use anyhow::Result;
use liftbook::{
    domain::{default_exercise, Exercise, Journal, JournalEntryId, MuscleGroup, Timestamp},
    InMemoryStore,
};
use time::Duration;

/// Author the dev store is seeded for.
pub const DEV_AUTHOR: &str = "demo";

fn exercise(
    entry_id: JournalEntryId,
    description: &str,
    weight: &str,
    sets: i64,
    reps: i64,
) -> Exercise {
    Exercise {
        exercise_description: description.to_string(),
        exercise_weight: weight.to_string(),
        exercise_sets: sets,
        exercise_repetitions: reps,
        ..default_exercise(entry_id)
    }
}

/// Fill the in-memory store with a finished leg day from yesterday and an
/// unstarted push day for today.
pub fn seed(store: &InMemoryStore) -> Result<()> {
    let now = Timestamp::now().as_offset_date_time();
    let yesterday = now - Duration::days(1);
    let stamp = |minutes: i64| Timestamp::from(yesterday + Duration::minutes(minutes));

    let legs = store.seed_journal(DEV_AUTHOR, Some(MuscleGroup::Legs));
    store.seed_journal_update(Journal {
        entry_date: stamp(0).to_iso_string(),
        notes: Some("Knees felt good".to_string()),
        journal_start: Some(stamp(0)),
        journal_finish: Some(stamp(14)),
        ..legs.clone()
    });
    let squats = store.seed_entry(legs.id, vec![stamp(3), stamp(6), stamp(9)])?;
    store.seed_exercise(&exercise(squats.id, "Back squat", "100kg", 3, 5))?;
    let lunges = store.seed_entry(legs.id, vec![stamp(12), stamp(14)])?;
    store.seed_exercise(&exercise(lunges.id, "Walking lunge", "2x20kg", 2, 10))?;
    store.seed_exercise(&exercise(lunges.id, "Calf raise", "60kg", 2, 15))?;

    let push = store.seed_journal(DEV_AUTHOR, Some(MuscleGroup::Push));
    let bench = store.seed_entry(push.id, vec![])?;
    store.seed_exercise(&exercise(bench.id, "Bench press", "80kg", 4, 6))?;
    store.seed_exercise(&exercise(bench.id, "Push-up", "", 4, 12))?;
    let press = store.seed_entry(push.id, vec![])?;
    store.seed_exercise(&exercise(press.id, "Overhead press", "45kg", 3, 8))?;

    Ok(())
}
