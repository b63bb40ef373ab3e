//! Live text filtering of the note list.

use crate::Note;

/// Returns the notes whose content contains `query`, ignoring case.
///
/// Order is preserved. An empty query returns every note.
pub fn filter_notes(notes: &[Note], query: &str) -> Vec<Note> {
    if query.is_empty() {
        return notes.to_vec();
    }
    let needle = query.to_lowercase();
    notes
        .iter()
        .filter(|note| note.content.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
