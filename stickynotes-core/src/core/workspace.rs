//! The signed-in user's workspace: one note store plus the view state
//! (search query, displayed month) that both derived views depend on.

use crate::{
    filter_notes, ClientConfig, CalendarMonth, MonthView, Note, NoteCommand, NoteStore,
    RemoteNoteClient, Result, SessionProvider, Snapshot,
};
use chrono::{Local, NaiveDate};
use std::sync::Arc;

/// Both derived views, computed from the same snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceViews {
    /// Notes matching the current query, in position order.
    pub notes: Vec<Note>,
    /// The displayed month, aggregated over the whole collection.
    pub calendar: MonthView,
    /// Size of the unfiltered collection.
    pub total: usize,
}

/// A note store paired with the list filter and the calendar month.
///
/// The store is shared; clone the `Arc` from [`store`](Self::store) to run
/// commands from other tasks while the workspace keeps deriving views.
pub struct Workspace {
    store: Arc<NoteStore>,
    query: String,
    month: CalendarMonth,
}

impl Workspace {
    /// Wraps an existing store, showing the current month and no filter.
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self {
            store,
            query: String::new(),
            month: CalendarMonth::current(),
        }
    }

    /// Builds a workspace talking to the remote store named in `config`.
    ///
    /// No request is made; call [`open`](Self::open) to load the notes.
    pub fn connect(config: &ClientConfig, session: Arc<dyn SessionProvider>) -> Result<Self> {
        let client = RemoteNoteClient::from_config(config, session)?;
        log::info!("Connecting to note store at {}", client.base_url());
        Ok(Self::new(Arc::new(NoteStore::new(Arc::new(client)))))
    }

    /// Loads the collection for the first time.
    pub async fn open(&self) -> Result<Snapshot> {
        self.store.refresh().await
    }

    pub fn store(&self) -> &Arc<NoteStore> {
        &self.store
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn show_month(&mut self, month: CalendarMonth) {
        self.month = month;
    }

    pub fn next_month(&mut self) -> CalendarMonth {
        self.month = self.month.next();
        self.month
    }

    pub fn prev_month(&mut self) -> CalendarMonth {
        self.month = self.month.prev();
        self.month
    }

    /// Derives both views, marking today on the local clock.
    pub fn views(&self) -> WorkspaceViews {
        self.views_on(Local::now().date_naive())
    }

    pub fn views_on(&self, today: NaiveDate) -> WorkspaceViews {
        let snapshot = self.store.snapshot();
        WorkspaceViews {
            notes: filter_notes(&snapshot, &self.query),
            calendar: MonthView::build(&snapshot, self.month, today),
            total: snapshot.len(),
        }
    }

    pub async fn dispatch(&self, command: NoteCommand) -> Result<Snapshot> {
        let label = command.label();
        command.execute(&self.store).await.map_err(|e| {
            log::warn!("{label} failed: {e}");
            e
        })
    }

    /// Drops everything belonging to the signed-in user.
    pub async fn logout(&mut self) {
        self.store.clear().await;
        self.query.clear();
        log::info!("Workspace cleared");
    }
}
