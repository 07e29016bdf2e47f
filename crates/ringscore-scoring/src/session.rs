//! Per-shooter score accumulation.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::classify::{Classification, ClassificationTable};

#[derive(thiserror::Error, Debug)]
pub enum SessionIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Shots recorded for one shooter, group and date.
///
/// Shots are only ever appended; `total` is their running sum, held as a
/// `u64`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreSession {
    shooter_name: String,
    group_id: String,
    date: NaiveDate,
    shots: Vec<u32>,
    total: u64,
}

impl ScoreSession {
    pub fn new(
        shooter_name: impl Into<String>,
        group_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            shooter_name: shooter_name.into(),
            group_id: group_id.into(),
            date,
            shots: Vec::new(),
            total: 0,
        }
    }

    pub fn record_shot(&mut self, score: u32) {
        self.shots.push(score);
        self.total += u64::from(score);
        debug!(
            "{}: shot {} scored {} (total {})",
            self.shooter_name,
            self.shots.len(),
            score,
            self.total
        );
    }

    pub fn record_shots(&mut self, scores: impl IntoIterator<Item = u32>) {
        for score in scores {
            self.record_shot(score);
        }
    }

    /// Clear shots and total; shooter, group and date are kept.
    pub fn reset(&mut self) {
        self.shots.clear();
        self.total = 0;
    }

    pub fn shooter_name(&self) -> &str {
        &self.shooter_name
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn set_shooter(&mut self, name: impl Into<String>) {
        self.shooter_name = name.into();
    }

    pub fn set_group(&mut self, group_id: impl Into<String>) {
        self.group_id = group_id.into();
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Shots in the order they were recorded.
    pub fn shots(&self) -> &[u32] {
        &self.shots
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn classification(&self, table: &ClassificationTable) -> Classification {
        table.classify(self.total)
    }

    pub fn snapshot(&self, table: &ClassificationTable) -> SessionRecord {
        SessionRecord {
            shooter_name: self.shooter_name.clone(),
            group_id: self.group_id.clone(),
            date: self.date,
            shots: self.shots.clone(),
            total: self.total,
            classification: self.classification(table),
        }
    }
}

/// Serializable view of a session for storage or display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub shooter_name: String,
    pub group_id: String,
    pub date: NaiveDate,
    pub shots: Vec<u32>,
    pub total: u64,
    pub classification: Classification,
}

impl SessionRecord {
    /// Rebuild a live session; the stored total is recomputed from the shots.
    pub fn to_session(&self) -> ScoreSession {
        let mut session = ScoreSession::new(&*self.shooter_name, &*self.group_id, self.date);
        session.record_shots(self.shots.iter().copied());
        session
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SessionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SessionIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).expect("date")
    }

    #[test]
    fn total_is_sum_of_shots() {
        let mut s = ScoreSession::new("An", "G1", date());
        s.record_shots([10, 8, 0, 5, 2]);
        assert_eq!(s.total(), 25);
        assert_eq!(s.shots(), &[10, 8, 0, 5, 2]);
    }

    #[test]
    fn reset_keeps_identity() {
        let mut s = ScoreSession::new("An", "G1", date());
        s.record_shots([10, 9]);
        s.reset();
        assert!(s.shots().is_empty());
        assert_eq!(s.total(), 0);
        s.record_shot(7);
        assert_eq!(s.total(), 7);
        assert_eq!(s.shooter_name(), "An");
        assert_eq!(s.group_id(), "G1");
        assert_eq!(s.date(), date());
    }

    #[test]
    fn snapshot_roundtrips_through_disk() {
        let table = ClassificationTable::from_pairs(&[(15, "pass")]).expect("table");
        let mut s = ScoreSession::new("Binh", "G2", date());
        s.record_shots([10, 8]);
        let rec = s.snapshot(&table);
        assert_eq!(rec.classification, Classification::Label("pass".into()));

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        rec.write_json(&path).expect("write");
        let back = SessionRecord::load_json(&path).expect("load");
        assert_eq!(back, rec);
        assert_eq!(back.to_session(), s);
    }

    #[test]
    fn large_scores_do_not_overflow_total() {
        let mut s = ScoreSession::new("An", "G1", date());
        s.record_shot(3_000_000_000);
        s.record_shot(3_000_000_000);
        assert_eq!(s.total(), 6_000_000_000);

        let table = ClassificationTable::from_pairs(&[(5_000_000_000, "max")]).expect("table");
        let rec = s.snapshot(&table);
        assert_eq!(rec.classification, Classification::Label("max".into()));
        assert_eq!(rec.to_session().total(), 6_000_000_000);
    }
}
