//! User actions expressed as data.
//!
//! A rendering layer turns each click, drag or keystroke into a
//! [`NoteCommand`] and hands it to [`NoteCommand::execute`]; nothing else in
//! the UI touches the store directly.

use crate::{NoteStore, Result, Snapshot};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single user action against the note collection.
///
/// Serialized with an `operation` tag, e.g.
/// `{"operation":"toggle","noteId":3}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum NoteCommand {
    /// Re-read the collection from the remote store.
    Refresh,
    /// Create a note.
    #[serde(rename_all = "camelCase")]
    Add {
        content: String,
        #[serde(default, with = "crate::core::note::iso_datetime")]
        due_date: Option<NaiveDateTime>,
    },
    /// Flip a note's completion flag.
    #[serde(rename_all = "camelCase")]
    Toggle { note_id: i64 },
    /// Replace a note's content.
    #[serde(rename_all = "camelCase")]
    Edit { note_id: i64, content: String },
    /// Paint a note with a palette color.
    #[serde(rename_all = "camelCase")]
    Recolor { note_id: i64, color_hex: String },
    /// Delete a note.
    #[serde(rename_all = "camelCase")]
    Remove { note_id: i64 },
    /// Apply a drag-and-drop result; `note_ids` is the complete new order.
    #[serde(rename_all = "camelCase")]
    Reorder { note_ids: Vec<i64> },
}

impl NoteCommand {
    /// Runs the command against `store` and returns the collection published
    /// afterwards.
    pub async fn execute(self, store: &NoteStore) -> Result<Snapshot> {
        log::debug!("Executing {}", self.label());
        match self {
            NoteCommand::Refresh => return store.refresh().await,
            NoteCommand::Add { content, due_date } => {
                store.add(&content, due_date).await?;
            }
            NoteCommand::Toggle { note_id } => {
                store.toggle(note_id).await?;
            }
            NoteCommand::Edit { note_id, content } => store.edit(note_id, &content).await?,
            NoteCommand::Recolor { note_id, color_hex } => {
                store.recolor(note_id, &color_hex).await?
            }
            NoteCommand::Remove { note_id } => store.remove(note_id).await?,
            NoteCommand::Reorder { note_ids } => {
                store.reorder(&note_ids).await?;
            }
        }
        Ok(store.snapshot())
    }

    pub fn label(&self) -> &'static str {
        match self {
            NoteCommand::Refresh => "refresh",
            NoteCommand::Add { .. } => "add",
            NoteCommand::Toggle { .. } => "toggle",
            NoteCommand::Edit { .. } => "edit",
            NoteCommand::Recolor { .. } => "recolor",
            NoteCommand::Remove { .. } => "remove",
            NoteCommand::Reorder { .. } => "reorder",
        }
    }
}
