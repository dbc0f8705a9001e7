//! Change detection between consecutive plan snapshots.

use super::PlanSnapshot;

/// Check whether `current` should be treated as a new plan.
///
/// An absent `previous` means nothing has been published yet, so any snapshot
/// counts as changed. Otherwise the comparison is a deep, order-sensitive
/// equality over both sequences with no ignored fields.
pub fn has_changed(previous: Option<&PlanSnapshot>, current: &PlanSnapshot) -> bool {
    previous.is_none_or(|previous| previous != current)
}
