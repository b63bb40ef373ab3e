//! In-memory stand-in for the remote note store, used by unit tests.
//!
//! Behaves like the real store for the parts the core depends on: IDs are
//! assigned on create, new notes are appended, `list` is ordered by
//! `position_index`, unknown IDs answer 404. Failures can be injected and
//! every call is recorded. Each call yields to the scheduler a few times
//! while counted as in flight, so overlapping calls are observable.

use crate::{Note, NoteApi, NoteDraft, NotePatch, Result, StickyNotesError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RemoteCall {
    List,
    Create(NoteDraft),
    Update(i64, NotePatch),
    Delete(i64),
}

#[derive(Default)]
struct MockState {
    notes: Vec<Note>,
    next_id: i64,
    calls: Vec<RemoteCall>,
    /// Updates allowed to succeed before every further update fails with 500.
    update_budget: Option<usize>,
    /// Status every call fails with, if set.
    failing_status: Option<u16>,
}

#[derive(Default)]
pub(crate) struct MockNoteApi {
    state: Mutex<MockState>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockNoteApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seeds one incomplete note per entry with IDs `1..` and positions `0..`.
    pub(crate) fn with_contents(contents: &[&str]) -> Self {
        let api = Self::new();
        {
            let mut state = api.state.lock().unwrap();
            for content in contents {
                let note = new_note(&mut state, &NoteDraft::new(*content, None));
                state.notes.push(note);
            }
        }
        api
    }

    /// Current server-side notes, ordered as `list` would return them.
    pub(crate) fn stored(&self) -> Vec<Note> {
        sorted(&self.state.lock().unwrap().notes)
    }

    pub(crate) fn calls(&self) -> Vec<RemoteCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub(crate) fn fail_update_after(&self, successes: usize) {
        self.state.lock().unwrap().update_budget = Some(successes);
    }

    /// Makes every following call fail with `status` (401 maps to `Unauthorized`).
    pub(crate) fn fail_with(&self, status: u16) {
        self.state.lock().unwrap().failing_status = Some(status);
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self, call: RemoteCall) -> Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let mut state = self.state.lock().unwrap();
        let is_update = matches!(call, RemoteCall::Update(..));
        state.calls.push(call);
        match state.failing_status {
            Some(401) => return Err(StickyNotesError::Unauthorized),
            Some(status) => {
                return Err(StickyNotesError::Remote {
                    status,
                    message: "injected failure".to_string(),
                })
            }
            None => {}
        }
        if is_update {
            if let Some(budget) = state.update_budget.as_mut() {
                if *budget == 0 {
                    return Err(StickyNotesError::Remote {
                        status: 500,
                        message: "injected update failure".to_string(),
                    });
                }
                *budget -= 1;
            }
        }
        Ok(())
    }
}

fn new_note(state: &mut MockState, draft: &NoteDraft) -> Note {
    state.next_id += 1;
    let position_index = state
        .notes
        .iter()
        .map(|n| n.position_index + 1)
        .max()
        .unwrap_or(0);
    Note {
        id: state.next_id,
        title: None,
        content: draft.content.clone(),
        due_date: draft.due_date,
        is_completed: draft.is_completed,
        color_hex: "#ffeb3b".to_string(),
        position_index,
        owner_id: 1,
    }
}

fn sorted(notes: &[Note]) -> Vec<Note> {
    let mut notes = notes.to_vec();
    notes.sort_by_key(|n| (n.position_index, n.id));
    notes
}

fn not_found() -> StickyNotesError {
    StickyNotesError::Remote {
        status: 404,
        message: "Note not found".to_string(),
    }
}

#[async_trait]
impl NoteApi for MockNoteApi {
    async fn list(&self) -> Result<Vec<Note>> {
        self.enter(RemoteCall::List).await?;
        Ok(self.stored())
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note> {
        self.enter(RemoteCall::Create(draft.clone())).await?;
        let mut state = self.state.lock().unwrap();
        let note = new_note(&mut state, draft);
        state.notes.push(note.clone());
        Ok(note)
    }

    async fn update(&self, id: i64, patch: &NotePatch) -> Result<Note> {
        self.enter(RemoteCall::Update(id, patch.clone())).await?;
        let mut state = self.state.lock().unwrap();
        let note = state
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(not_found)?;
        if let Some(title) = &patch.title {
            note.title = Some(title.clone());
        }
        if let Some(content) = &patch.content {
            note.content = content.clone();
        }
        if let Some(due) = patch.due_date {
            note.due_date = Some(due);
        }
        if let Some(done) = patch.is_completed {
            note.is_completed = done;
        }
        if let Some(color) = &patch.color_hex {
            note.color_hex = color.clone();
        }
        if let Some(position) = patch.position_index {
            note.position_index = position;
        }
        Ok(note.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.enter(RemoteCall::Delete(id)).await?;
        let mut state = self.state.lock().unwrap();
        let before = state.notes.len();
        state.notes.retain(|n| n.id != id);
        if state.notes.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
