//! Rendering of plan snapshots into notification documents.

use super::document::NotificationDocument;
use crate::plan::{PlanEntry, PlanSnapshot};

pub const TITLE: &str = "Schedule";
pub const CHANGED_DESCRIPTION: &str = "A change was detected";
pub const EMPTY_DESCRIPTION: &str = "There are no changes for the upcoming days.";

/// Build the notification announcing `current`.
///
/// Day announcements come first as full-width fields, followed by one inline
/// field per substitution. A snapshot without either gets the empty-plan
/// description and no fields.
pub fn render(current: &PlanSnapshot) -> NotificationDocument {
    let mut doc = NotificationDocument::new(TITLE, CHANGED_DESCRIPTION);

    for info in &current.infos {
        doc = doc.with_field(
            format!("Additional information for {}", info.day),
            info.info.clone(),
            false,
        );
    }

    for entry in &current.data {
        doc = doc.with_field(entry.day.clone(), entry_value(entry), true);
    }

    if current.is_empty() {
        doc = doc.with_description(EMPTY_DESCRIPTION);
    }

    doc
}

fn entry_value(entry: &PlanEntry) -> String {
    format!(
        "Lesson: {}\nSubject: {}\nRoom: {}\nTeachers: {}\nType: {}\nNotes: {}",
        entry.lesson, entry.subject, entry.room, entry.teachers, entry.info, entry.notes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::test_support::*;

    #[test]
    fn test_empty_snapshot_uses_fallback_description() {
        let doc = render(&PlanSnapshot::default());

        assert_eq!(doc.title(), "Schedule");
        assert_eq!(doc.description(), EMPTY_DESCRIPTION);
        assert!(doc.fields().is_empty());
    }

    #[test]
    fn test_infos_precede_entries() {
        let snapshot = snapshot(
            vec![info("Montag", "Wandertag"), info("Dienstag", "Zeugnisse")],
            vec![entry("Montag", "3", "Mathe")],
        );

        let doc = render(&snapshot);

        assert_eq!(doc.description(), CHANGED_DESCRIPTION);
        assert_eq!(doc.fields().len(), 3);
        assert_eq!(doc.fields()[0].name, "Additional information for Montag");
        assert_eq!(doc.fields()[0].value, "Wandertag");
        assert!(!doc.fields()[0].inline);
        assert_eq!(doc.fields()[1].name, "Additional information for Dienstag");
        assert_eq!(doc.fields()[2].name, "Montag");
        assert!(doc.fields()[2].inline);
    }

    #[test]
    fn test_entry_value_lists_every_column() {
        let mut e = entry("Montag", "3", "Mathe");
        e.notes = "Buch mitbringen".to_string();

        let doc = render(&snapshot(vec![], vec![e]));

        assert_eq!(
            doc.fields()[0].value,
            "Lesson: 3\nSubject: Mathe\nRoom: A101\nTeachers: MUE\nType: Vertretung\nNotes: Buch mitbringen"
        );
    }

    #[test]
    fn test_only_infos_is_not_empty() {
        let doc = render(&snapshot(vec![info("Montag", "Wandertag")], vec![]));
        assert_eq!(doc.description(), CHANGED_DESCRIPTION);
        assert_eq!(doc.fields().len(), 1);
    }
}
