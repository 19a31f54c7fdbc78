use serde::{de, Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    UtcOffset,
};

use super::{timestamp, JournalId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuscleGroup {
    Push,
    Pull,
    Legs,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; 3] = [MuscleGroup::Push, MuscleGroup::Pull, MuscleGroup::Legs];

    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Push => "push",
            MuscleGroup::Pull => "pull",
            MuscleGroup::Legs => "legs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MuscleGroup::Push => "Push",
            MuscleGroup::Pull => "Pull",
            MuscleGroup::Legs => "Legs",
        }
    }

    /// The next group in selector order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            MuscleGroup::Push => MuscleGroup::Pull,
            MuscleGroup::Pull => MuscleGroup::Legs,
            MuscleGroup::Legs => MuscleGroup::Push,
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown muscle group: {0}")]
pub struct UnknownMuscleGroup(pub String);

impl FromStr for MuscleGroup {
    type Err = UnknownMuscleGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MuscleGroup::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMuscleGroup(s.to_string()))
    }
}

/// One workout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub id: JournalId,
    pub author: String,
    /// Unset until the user picks one; a freshly created journal has none.
    #[serde(default, deserialize_with = "deserialize_muscle_group")]
    pub muscle_group: Option<MuscleGroup>,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub entry_date: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub journal_start: Option<Timestamp>,
    #[serde(default, with = "timestamp::option")]
    pub journal_finish: Option<Timestamp>,
}

impl Journal {
    pub fn is_started(&self) -> bool {
        self.journal_start.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.journal_finish.is_some()
    }

    /// Calendar day of the journal at the given offset.
    ///
    /// `entry_date` is whatever the server stores; both full RFC 3339
    /// timestamps and plain `YYYY-MM-DD` prefixes are understood.
    pub fn entry_day(&self, offset: UtcOffset) -> Option<Date> {
        let raw = self.entry_date.trim();
        if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Some(dt.to_offset(offset).date());
        }
        let day = raw.get(..10)?;
        Date::parse(day, format_description!("[year]-[month]-[day]")).ok()
    }

    /// `2024-03-05 Tuesday 07:45`: day, weekday and start clock when started.
    pub fn title(&self, offset: UtcOffset) -> String {
        let mut title = match self.entry_day(offset) {
            Some(day) => format!(
                "{:04}-{:02}-{:02} {}",
                day.year(),
                day.month() as u8,
                day.day(),
                day.weekday()
            ),
            None => self.entry_date.clone(),
        };
        if let Some(start) = self.journal_start {
            title.push(' ');
            title.push_str(&start.clock_at(offset));
        }
        title
    }
}

fn deserialize_muscle_group<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<MuscleGroup>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}

fn deserialize_nullable_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, offset};

    fn journal_json(muscle_group: &str) -> String {
        format!(
            r#"{{"id":7,"author":"jdoe","muscle_group":{muscle_group},"entry_date":"2024-03-05T22:30:00.000Z","notes":null,"journal_start":"2024-03-05T22:45:00.000Z","journal_finish":null}}"#
        )
    }

    #[test]
    fn decodes_server_journal() {
        let journal: Journal = serde_json::from_str(&journal_json(r#""pull""#)).unwrap();
        assert_eq!(journal.id, JournalId::new(7));
        assert_eq!(journal.muscle_group, Some(MuscleGroup::Pull));
        assert!(journal.is_started());
        assert!(!journal.is_finished());
    }

    #[test]
    fn blank_muscle_group_is_unset() {
        for raw in ["null", r#""""#] {
            let journal: Journal = serde_json::from_str(&journal_json(raw)).unwrap();
            assert_eq!(journal.muscle_group, None);
        }
    }

    #[test]
    fn muscle_group_cycles() {
        assert_eq!(MuscleGroup::Push.next(), MuscleGroup::Pull);
        assert_eq!(MuscleGroup::Legs.next(), MuscleGroup::Push);
        assert_eq!("LEGS".parse::<MuscleGroup>(), Ok(MuscleGroup::Legs));
        assert!("arms".parse::<MuscleGroup>().is_err());
    }

    #[test]
    fn entry_day_follows_offset() {
        let journal: Journal = serde_json::from_str(&journal_json("null")).unwrap();
        assert_eq!(journal.entry_day(UtcOffset::UTC), Some(date!(2024 - 03 - 05)));
        assert_eq!(journal.entry_day(offset!(+02:00)), Some(date!(2024 - 03 - 06)));
    }

    #[test]
    fn title_includes_weekday_and_start() {
        let journal: Journal = serde_json::from_str(&journal_json("null")).unwrap();
        assert_eq!(journal.title(UtcOffset::UTC), "2024-03-05 Tuesday 22:45");
    }

    #[test]
    fn plain_dates_are_understood() {
        let mut journal: Journal = serde_json::from_str(&journal_json("null")).unwrap();
        journal.entry_date = "2024-01-01".to_string();
        journal.journal_start = None;
        assert_eq!(journal.title(UtcOffset::UTC), "2024-01-01 Monday");
    }
}
