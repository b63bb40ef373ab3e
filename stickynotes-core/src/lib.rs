//! Core library for a sticky-notes workspace backed by a remote note store.
//!
//! The primary entry point is [`Workspace`], which pairs a [`NoteStore`] with
//! the list filter and the displayed calendar month. Every mutation goes
//! through the store, is forwarded to the remote store over [`NoteApi`], and
//! is followed by a full re-read before anything is published.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    calendar::{aggregate_month, CalendarMonth, DayBucket, MonthView},
    command::NoteCommand,
    config::{
        config_file_path, load_config, load_config_from, save_config, ClientConfig, API_URL_ENV,
        DEFAULT_API_BASE_URL,
    },
    error::{Result, StickyNotesError},
    note::{Note, NoteColor, NoteDraft, NotePatch},
    remote::{NoteApi, RemoteNoteClient},
    reorder::{apply_reorder, plan_reorder, PositionUpdate},
    search::filter_notes,
    session::{InMemorySession, SessionProvider},
    store::{NoteStore, Snapshot},
    workspace::{Workspace, WorkspaceViews},
};
