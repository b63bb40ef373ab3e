//! Translation of a drag-and-drop permutation into remote position updates.

use crate::{Note, NoteApi, NotePatch, Result, StickyNotesError};
use std::collections::{HashMap, HashSet};

/// One `position_index` write the coordinator will issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionUpdate {
    pub note_id: i64,
    pub position_index: i32,
}

/// Computes the position writes that turn `current` into `new_order`.
///
/// Only notes whose `position_index` differs from their index in
/// `new_order` get an update, so re-applying an order that is already in
/// place yields an empty plan. Updates are listed in ascending target index.
///
/// # Errors
///
/// Returns [`StickyNotesError::InvalidReorder`] unless `new_order` is exactly
/// a permutation of the IDs in `current`.
pub fn plan_reorder(current: &[Note], new_order: &[i64]) -> Result<Vec<PositionUpdate>> {
    if new_order.len() != current.len() {
        return Err(StickyNotesError::InvalidReorder(format!(
            "expected {} note IDs, got {}",
            current.len(),
            new_order.len()
        )));
    }

    let positions: HashMap<i64, i32> = current
        .iter()
        .map(|n| (n.id, n.position_index))
        .collect();

    let mut seen = HashSet::with_capacity(new_order.len());
    let mut plan = Vec::new();
    for (i, id) in new_order.iter().enumerate() {
        if !seen.insert(*id) {
            return Err(StickyNotesError::InvalidReorder(format!("note {id} appears more than once")));
        }
        let Some(&position) = positions.get(id) else {
            return Err(StickyNotesError::InvalidReorder(format!("note {id} is not in the collection")));
        };
        let target = i32::try_from(i)
            .map_err(|_| StickyNotesError::InvalidReorder("collection too large".to_string()))?;
        if position != target {
            plan.push(PositionUpdate {
                note_id: *id,
                position_index: target,
            });
        }
    }

    Ok(plan)
}

/// Validates `new_order` against `current` and issues the position writes
/// one at a time, in ascending index order.
///
/// Writes are never issued concurrently. The first failing write aborts the
/// rest and its error is returned; writes already applied stay applied.
/// Returns the number of writes issued.
///
/// # Errors
///
/// [`StickyNotesError::InvalidReorder`] before any network traffic for a bad
/// permutation; otherwise whatever the failing write returned.
pub async fn apply_reorder(api: &dyn NoteApi, current: &[Note], new_order: &[i64]) -> Result<usize> {
    let plan = plan_reorder(current, new_order)?;
    for (done, update) in plan.iter().enumerate() {
        if let Err(e) = api
            .update(update.note_id, &NotePatch::position(update.position_index))
            .await
        {
            log::warn!(
                "Reorder aborted after {done} of {} position updates: {e}",
                plan.len()
            );
            return Err(e);
        }
    }
    Ok(plan.len())
}
