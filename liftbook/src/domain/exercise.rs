use serde::{Deserialize, Serialize};

use super::{ExerciseId, JournalEntryId};

/// One movement in an entry. Weight is free text so it can hold units or
/// ranges ("135", "2x24kg", "60-70").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ExerciseId>,
    pub journal_entry_id: JournalEntryId,
    #[serde(default)]
    pub exercise_description: String,
    #[serde(default)]
    pub exercise_weight: String,
    #[serde(default)]
    pub exercise_sets: i64,
    #[serde(default)]
    pub exercise_repetitions: i64,
}

impl Exercise {
    /// A copy for another entry, without the server id.
    pub fn duplicate_into(&self, entry_id: JournalEntryId) -> Self {
        Self {
            id: None,
            journal_entry_id: entry_id,
            ..self.clone()
        }
    }
}

/// An editable column of the exercise table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExerciseField {
    Description,
    Weight,
    Sets,
    Repetitions,
}

impl ExerciseField {
    pub const ALL: [ExerciseField; 4] = [
        ExerciseField::Description,
        ExerciseField::Weight,
        ExerciseField::Sets,
        ExerciseField::Repetitions,
    ];

    /// Column name on the wire.
    pub fn column(&self) -> &'static str {
        match self {
            ExerciseField::Description => "exercise_description",
            ExerciseField::Weight => "exercise_weight",
            ExerciseField::Sets => "exercise_sets",
            ExerciseField::Repetitions => "exercise_repetitions",
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            ExerciseField::Description => "Exercise",
            ExerciseField::Weight => "Weight",
            ExerciseField::Sets => "Sets",
            ExerciseField::Repetitions => "Reps",
        }
    }

    /// Store a raw cell value, coercing the count columns.
    pub fn apply(&self, exercise: &mut Exercise, raw: &str) {
        match self {
            ExerciseField::Description => exercise.exercise_description = raw.to_string(),
            ExerciseField::Weight => exercise.exercise_weight = raw.to_string(),
            ExerciseField::Sets => exercise.exercise_sets = coerce_count(raw),
            ExerciseField::Repetitions => exercise.exercise_repetitions = coerce_count(raw),
        }
    }

    /// Cell text. Zero counts show as blank, like an untouched input.
    pub fn display(&self, exercise: &Exercise) -> String {
        let count = |n: i64| if n == 0 { String::new() } else { n.to_string() };
        match self {
            ExerciseField::Description => exercise.exercise_description.clone(),
            ExerciseField::Weight => exercise.exercise_weight.clone(),
            ExerciseField::Sets => count(exercise.exercise_sets),
            ExerciseField::Repetitions => count(exercise.exercise_repetitions),
        }
    }
}

/// Integer value of a count cell.
///
/// Reads an optional sign and the leading digits, ignoring anything after
/// them; blank or non-numeric input is 0. Out-of-range values saturate.
pub fn coerce_count(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(digit - b'0');
        value = value.saturating_mul(10).saturating_add(digit);
    }

    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> Exercise {
        Exercise {
            id: Some(ExerciseId::new(1)),
            journal_entry_id: JournalEntryId::new(2),
            exercise_description: String::new(),
            exercise_weight: String::new(),
            exercise_sets: 0,
            exercise_repetitions: 0,
        }
    }

    #[test]
    fn coerces_counts_like_parse_int() {
        assert_eq!(coerce_count(""), 0);
        assert_eq!(coerce_count("abc"), 0);
        assert_eq!(coerce_count("12"), 12);
        assert_eq!(coerce_count(" 8 reps"), 8);
        assert_eq!(coerce_count("3x10"), 3);
        assert_eq!(coerce_count("-2"), -2);
        assert_eq!(coerce_count("+"), 0);
        assert_eq!(coerce_count("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn non_numeric_sets_store_zero() {
        let mut exercise = blank();
        exercise.exercise_sets = 4;
        ExerciseField::Sets.apply(&mut exercise, "lots");
        assert_eq!(exercise.exercise_sets, 0);
    }

    #[test]
    fn text_columns_store_raw_value() {
        let mut exercise = blank();
        ExerciseField::Weight.apply(&mut exercise, "60-70kg");
        ExerciseField::Description.apply(&mut exercise, "bench");
        assert_eq!(exercise.exercise_weight, "60-70kg");
        assert_eq!(exercise.exercise_description, "bench");
    }

    #[test]
    fn zero_counts_display_blank() {
        let mut exercise = blank();
        assert_eq!(ExerciseField::Sets.display(&exercise), "");
        exercise.exercise_repetitions = 10;
        assert_eq!(ExerciseField::Repetitions.display(&exercise), "10");
    }

    #[test]
    fn id_is_omitted_when_absent() {
        let copy = blank().duplicate_into(JournalEntryId::new(9));
        let json = serde_json::to_value(&copy).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["journal_entry_id"], 9);
    }
}
