//! The authoritative in-memory note collection.
//!
//! [`NoteStore`] owns the signed-in user's notes and is the only thing that
//! ever replaces them. Every mutation is forwarded to the remote store and
//! followed by a full re-read; the local copy is never patched in place.
//! The freshly read collection is then published as an immutable
//! [`Snapshot`] to every subscriber.
//!
//! All operations, reads included, go through one FIFO queue, so a refresh
//! belonging to one operation can never land in the middle of another.

use crate::{apply_reorder, Note, NoteApi, NoteColor, NoteDraft, NotePatch, Result, StickyNotesError};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// A fully reconciled, immutable view of the collection, ordered by `position_index`.
pub type Snapshot = Arc<Vec<Note>>;

/// Process-wide cache of the signed-in user's notes.
pub struct NoteStore {
    api: Arc<dyn NoteApi>,
    queue: Mutex<()>,
    published: watch::Sender<Snapshot>,
}

impl NoteStore {
    /// Creates an empty store. Call [`refresh`](Self::refresh) to populate it.
    pub fn new(api: Arc<dyn NoteApi>) -> Self {
        let (published, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            api,
            queue: Mutex::new(()),
            published,
        }
    }

    /// Returns the most recently published collection.
    pub fn snapshot(&self) -> Snapshot {
        self.published.borrow().clone()
    }

    /// Returns a receiver that is notified after every publish.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.published.subscribe()
    }

    /// Looks up a note in the current snapshot.
    pub fn get(&self, id: i64) -> Option<Note> {
        self.published.borrow().iter().find(|n| n.id == id).cloned()
    }

    /// Replaces the collection with a fresh read from the remote store.
    ///
    /// # Errors
    ///
    /// Propagates the remote failure. The previous snapshot stays published,
    /// except on [`StickyNotesError::Unauthorized`], which empties it.
    pub async fn refresh(&self) -> Result<Snapshot> {
        let _turn = self.queue.lock().await;
        self.reconcile().await
    }

    /// Empties the collection, as on logout.
    pub async fn clear(&self) {
        let _turn = self.queue.lock().await;
        self.publish(Vec::new());
    }

    /// Creates a note from trimmed `content` and refreshes.
    ///
    /// # Errors
    ///
    /// Returns [`StickyNotesError::ValidationFailed`] without contacting the
    /// remote store if `content` is empty or whitespace-only.
    pub async fn add(&self, content: &str, due_date: Option<NaiveDateTime>) -> Result<Note> {
        let content = content.trim();
        if content.is_empty() {
            return Err(StickyNotesError::ValidationFailed(
                "Note content cannot be empty".to_string(),
            ));
        }

        let _turn = self.queue.lock().await;
        let created = self
            .remote(self.api.create(&NoteDraft::new(content, due_date)).await)?;
        log::info!("Created note {}", created.id);
        self.reconcile().await?;
        Ok(created)
    }

    /// Flips the completion flag of note `id` and refreshes.
    ///
    /// # Errors
    ///
    /// Returns [`StickyNotesError::NoteNotFound`] without contacting the
    /// remote store if `id` is not in the current collection.
    pub async fn toggle(&self, id: i64) -> Result<Note> {
        let _turn = self.queue.lock().await;
        let current = self.get(id).ok_or(StickyNotesError::NoteNotFound(id))?;
        let updated = self.remote(
            self.api
                .update(id, &NotePatch::completed(!current.is_completed))
                .await,
        )?;
        log::info!("Note {id} marked {}", if updated.is_completed { "done" } else { "open" });
        self.reconcile().await?;
        Ok(updated)
    }

    /// Replaces the content of note `id` and refreshes.
    ///
    /// Content that trims to empty is ignored: nothing is sent and no
    /// refresh happens.
    pub async fn edit(&self, id: i64, new_content: &str) -> Result<()> {
        let new_content = new_content.trim();
        if new_content.is_empty() {
            log::debug!("Ignoring empty edit of note {id}");
            return Ok(());
        }

        let _turn = self.queue.lock().await;
        self.remote(self.api.update(id, &NotePatch::content(new_content)).await)?;
        log::info!("Edited note {id}");
        self.reconcile().await?;
        Ok(())
    }

    /// Paints note `id` with palette color `hex` and refreshes.
    ///
    /// # Errors
    ///
    /// Returns [`StickyNotesError::ValidationFailed`] without contacting the
    /// remote store if `hex` is not a palette token.
    pub async fn recolor(&self, id: i64, hex: &str) -> Result<()> {
        let color: NoteColor = hex.parse()?;

        let _turn = self.queue.lock().await;
        self.remote(self.api.update(id, &NotePatch::color(color)).await)?;
        log::info!("Recolored note {id} to {color}");
        self.reconcile().await?;
        Ok(())
    }

    /// Deletes note `id` and refreshes.
    pub async fn remove(&self, id: i64) -> Result<()> {
        let _turn = self.queue.lock().await;
        self.remote(self.api.delete(id).await)?;
        log::info!("Deleted note {id}");
        self.reconcile().await?;
        Ok(())
    }

    /// Moves the notes into `new_order` and refreshes once at the end.
    ///
    /// The refresh happens even when a position update fails midway, so the
    /// published collection shows the order the remote store actually holds.
    /// Returns the number of position updates issued.
    ///
    /// # Errors
    ///
    /// [`StickyNotesError::InvalidReorder`] (no network traffic, no refresh)
    /// if `new_order` is not a permutation of the current IDs; otherwise the
    /// first failing update's error, reported after the refresh.
    pub async fn reorder(&self, new_order: &[i64]) -> Result<usize> {
        let _turn = self.queue.lock().await;
        let current = self.snapshot();

        let outcome = match apply_reorder(self.api.as_ref(), &current, new_order).await {
            Err(e @ StickyNotesError::InvalidReorder(_)) => return Err(e),
            Err(StickyNotesError::Unauthorized) => {
                return self.remote(Err(StickyNotesError::Unauthorized))
            }
            other => other,
        };

        let refreshed = self.reconcile().await;
        match (outcome, refreshed) {
            (Ok(updates), Ok(_)) => {
                log::info!("Reordered {} notes with {updates} position updates", new_order.len());
                Ok(updates)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), refreshed) => {
                if let Err(refresh_err) = refreshed {
                    log::warn!("Refresh after failed reorder also failed: {refresh_err}");
                }
                Err(e)
            }
        }
    }

    /// Reads the full collection and publishes it. Caller must hold the queue.
    async fn reconcile(&self) -> Result<Snapshot> {
        let mut notes = self.remote(self.api.list().await)?;
        notes.sort_by_key(|n| n.position_index);
        warn_on_duplicate_positions(&notes);
        Ok(self.publish(notes))
    }

    fn publish(&self, notes: Vec<Note>) -> Snapshot {
        let snapshot = Arc::new(notes);
        log::debug!("Publishing {} notes", snapshot.len());
        self.published.send_replace(Arc::clone(&snapshot));
        snapshot
    }

    /// Passes a remote result through, emptying the collection when the
    /// session was rejected.
    fn remote<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(StickyNotesError::Unauthorized) = &result {
            self.publish(Vec::new());
        }
        result
    }
}

fn warn_on_duplicate_positions(notes: &[Note]) {
    let mut seen = HashSet::with_capacity(notes.len());
    for note in notes {
        if !seen.insert(note.position_index) {
            log::warn!(
                "Notes share position_index {} (note {})",
                note.position_index,
                note.id
            );
        }
    }
}
