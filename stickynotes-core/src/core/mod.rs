//! Internal domain modules for the sticky-notes core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod calendar;
pub mod command;
pub mod config;
pub mod error;
pub mod note;
pub mod remote;
pub mod reorder;
pub mod search;
pub mod session;
pub mod store;
pub mod workspace;

#[cfg(test)]
pub(crate) mod mock_remote;

#[doc(inline)]
pub use calendar::{aggregate_month, CalendarMonth, DayBucket, MonthView};
#[doc(inline)]
pub use command::NoteCommand;
#[doc(inline)]
pub use config::{
    config_file_path, load_config, load_config_from, save_config, ClientConfig, API_URL_ENV,
    DEFAULT_API_BASE_URL,
};
#[doc(inline)]
pub use error::{Result, StickyNotesError};
#[doc(inline)]
pub use note::{Note, NoteColor, NoteDraft, NotePatch};
#[doc(inline)]
pub use remote::{NoteApi, RemoteNoteClient};
#[doc(inline)]
pub use reorder::{apply_reorder, plan_reorder, PositionUpdate};
#[doc(inline)]
pub use search::filter_notes;
#[doc(inline)]
pub use session::{InMemorySession, SessionProvider};
#[doc(inline)]
pub use store::{NoteStore, Snapshot};
#[doc(inline)]
pub use workspace::{Workspace, WorkspaceViews};
