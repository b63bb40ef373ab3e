//! Typed HTTP boundary to the remote note store.

use crate::{ClientConfig, Note, NoteDraft, NotePatch, Result, SessionProvider, StickyNotesError};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// The operations the core needs from the remote note store.
///
/// Implementations must not retry; every call maps to exactly one request.
#[async_trait]
pub trait NoteApi: Send + Sync {
    /// Fetches the full collection, ordered by `position_index`.
    async fn list(&self) -> Result<Vec<Note>>;

    /// Creates a note; the store assigns `id` and an appended `position_index`.
    async fn create(&self, draft: &NoteDraft) -> Result<Note>;

    /// Applies a partial update and returns the updated note.
    async fn update(&self, id: i64, patch: &NotePatch) -> Result<Note>;

    /// Deletes a note.
    async fn delete(&self, id: i64) -> Result<()>;
}

/// [`NoteApi`] over HTTP/JSON, authenticated with the session's bearer token.
///
/// A 401 from any endpoint invokes [`SessionProvider::force_logout`] and
/// fails the call with [`StickyNotesError::Unauthorized`].
pub struct RemoteNoteClient {
    base_url: String,
    client: reqwest::Client,
    session: Arc<dyn SessionProvider>,
}

impl RemoteNoteClient {
    pub fn new(base_url: &str, session: Arc<dyn SessionProvider>) -> Self {
        Self::with_client(base_url, reqwest::Client::new(), session)
    }

    /// Uses a caller-built `reqwest::Client` (proxy, TLS, connection pool settings).
    pub fn with_client(
        base_url: &str,
        client: reqwest::Client,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            session,
        }
    }

    /// Builds a client from persisted settings.
    ///
    /// # Errors
    ///
    /// Returns [`StickyNotesError::Config`] if the base URL is empty, or
    /// [`StickyNotesError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig, session: Arc<dyn SessionProvider>) -> Result<Self> {
        if config.api_base_url.trim().is_empty() {
            return Err(StickyNotesError::Config("apiBaseUrl is empty".to_string()));
        }
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self::with_client(&config.api_base_url, builder.build()?, session))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn notes_url(&self) -> String {
        format!("{}/notes/", self.base_url)
    }

    fn note_url(&self, id: i64) -> String {
        format!("{}/notes/{}", self.base_url, id)
    }

    /// Attaches the bearer token, sends, and maps failure statuses.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let Some(token) = self.session.bearer_token() else {
            log::warn!("{what}: no session token");
            self.session.force_logout();
            return Err(StickyNotesError::Unauthorized);
        };

        log::debug!("{what}");
        let resp = request.bearer_auth(token).send().await?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            log::warn!("{what}: session rejected (401)");
            self.session.force_logout();
            return Err(StickyNotesError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let err = remote_error(status, &body);
            log::warn!("{what}: {err}");
            return Err(err);
        }
        Ok(resp)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| StickyNotesError::Decode(e.to_string()))
}

/// Builds a [`StickyNotesError::Remote`] from a failed response.
///
/// The store reports errors as `{"detail": "..."}`, or as a list of
/// `{"msg": "..."}` entries for request validation failures.
fn remote_error(status: StatusCode, body: &str) -> StickyNotesError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| match v.get("detail")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg")?.as_str())
                    .collect();
                (!msgs.is_empty()).then(|| msgs.join("; "))
            }
            _ => None,
        });

    let message = match detail {
        Some(d) => d,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };

    StickyNotesError::Remote {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl NoteApi for RemoteNoteClient {
    async fn list(&self) -> Result<Vec<Note>> {
        let resp = self
            .send(self.client.get(self.notes_url()), "GET /notes/")
            .await?;
        decode(resp).await
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note> {
        let resp = self
            .send(self.client.post(self.notes_url()).json(draft), "POST /notes/")
            .await?;
        decode(resp).await
    }

    async fn update(&self, id: i64, patch: &NotePatch) -> Result<Note> {
        let what = format!("PUT /notes/{id}");
        let resp = self
            .send(self.client.put(self.note_url(id)).json(patch), &what)
            .await?;
        decode(resp).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let what = format!("DELETE /notes/{id}");
        self.send(self.client.delete(self.note_url(id)), &what)
            .await?;
        Ok(())
    }
}
