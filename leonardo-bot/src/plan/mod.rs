//! Substitution plan snapshots.
//!
//! A [`PlanSnapshot`] is one fetched-and-parsed state of the plan API. Two
//! snapshots are the same plan only if every field of every entry matches,
//! in the same order.

pub mod detector;
pub mod fetcher;

pub use detector::has_changed;
pub use fetcher::{HttpPlanSource, PlanSource};

use serde::{Deserialize, Serialize};

/// Full plan document as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    /// Free-text announcements, one per day at most.
    pub infos: Vec<PlanInfo>,
    /// Individual substitutions.
    pub data: Vec<PlanEntry>,
}

/// Additional information published for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanInfo {
    pub day: String,
    pub info: String,
}

/// A single substitution row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub day: String,
    pub lesson: String,
    pub subject: String,
    pub room: String,
    pub teachers: String,
    /// Kind of substitution (cancelled, room change, ...).
    pub info: String,
    pub notes: String,
}

impl PlanSnapshot {
    /// Whether the snapshot carries neither infos nor entries.
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty() && self.data.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn info(day: &str, info: &str) -> PlanInfo {
        PlanInfo {
            day: day.to_string(),
            info: info.to_string(),
        }
    }

    pub fn entry(day: &str, lesson: &str, subject: &str) -> PlanEntry {
        PlanEntry {
            day: day.to_string(),
            lesson: lesson.to_string(),
            subject: subject.to_string(),
            room: "A101".to_string(),
            teachers: "MUE".to_string(),
            info: "Vertretung".to_string(),
            notes: String::new(),
        }
    }

    pub fn snapshot(infos: Vec<PlanInfo>, data: Vec<PlanEntry>) -> PlanSnapshot {
        PlanSnapshot { infos, data }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_deserialize_ignores_unknown_keys() {
        let json = r#"{
            "infos": [{"day": "Monday", "info": "Sports day"}],
            "data": [{
                "day": "Monday", "class": "10b", "lesson": "3", "subject": "Math",
                "room": "A101", "teachers": "MUE", "info": "Vertretung", "notes": ""
            }]
        }"#;

        let snapshot: PlanSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.infos, vec![info("Monday", "Sports day")]);
        assert_eq!(snapshot.data, vec![entry("Monday", "3", "Math")]);
    }

    #[test]
    fn test_deserialize_rejects_missing_fields() {
        let json = r#"{"infos": [], "data": [{"day": "Monday"}]}"#;
        assert!(serde_json::from_str::<PlanSnapshot>(json).is_err());
    }

    #[test]
    fn test_is_empty() {
        assert!(PlanSnapshot::default().is_empty());
        assert!(!snapshot(vec![info("Monday", "x")], vec![]).is_empty());
    }
}
