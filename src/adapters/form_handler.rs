//! HTTP handlers for rendering forms, applying widget events and decoding
//! submissions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::page::{FormPage, PageRenderer};
use super::submission::{decode_submission, Submission};
use crate::config::{FormConfig, Settings};
use crate::widgets::{
    EventOutcome, FormChange, FormContext, FormEvent, FormSession, WidgetError, WidgetRegistry,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    Widget(#[from] WidgetError),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::FormNotFound(_) | Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::Widget(WidgetError::MissingTarget { .. }) => StatusCode::NOT_FOUND,
            Self::Widget(_) | Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Response header carrying the id of the session a page render opened.
pub const SESSION_HEADER: &str = "x-form-session";

/// Live sessions kept before the oldest is dropped.
pub const DEFAULT_SESSION_LIMIT: usize = 1024;

struct LiveSession {
    form: String,
    /// Open order, for eviction
    opened: u64,
    session: FormSession,
}

/// Live form sessions, one per rendered page, keyed by session id.
#[derive(Clone)]
pub struct FormStore {
    sessions: Arc<RwLock<HashMap<String, LiveSession>>>,
    opened: Arc<AtomicU64>,
    limit: usize,
}

impl Default for FormStore {
    fn default() -> Self {
        Self::with_limit(DEFAULT_SESSION_LIMIT)
    }
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            opened: Arc::new(AtomicU64::new(0)),
            limit: limit.max(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Register `session` for `form` and return its new id.
    pub async fn open(&self, form: &str, session: FormSession) -> String {
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;

        while sessions.len() >= self.limit {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, live)| live.opened)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(oldest) => {
                    tracing::debug!(session = %oldest, "evicting oldest form session");
                    sessions.remove(&oldest);
                }
                None => break,
            }
        }

        sessions.insert(
            id.clone(),
            LiveSession {
                form: form.to_string(),
                opened: self.opened.fetch_add(1, Ordering::Relaxed),
                session,
            },
        );
        id
    }

    /// Apply `event` to the session `id`, which must belong to `form`.
    pub async fn apply(&self, form: &str, id: &str, event: FormEvent) -> Result<FormChange, ApiError> {
        let mut sessions = self.sessions.write().await;
        let live = sessions
            .get_mut(id)
            .filter(|live| live.form == form)
            .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))?;
        Ok(live.session.apply(event)?)
    }
}

#[derive(Clone)]
pub struct FormState {
    pub settings: Arc<Settings>,
    pub registry: Arc<WidgetRegistry>,
    pub store: FormStore,
    pub pages: Arc<PageRenderer>,
}

impl FormState {
    pub fn new(settings: Arc<Settings>, registry: Arc<WidgetRegistry>) -> Result<Self, tera::Error> {
        Ok(Self {
            settings,
            registry,
            store: FormStore::new(),
            pages: Arc::new(PageRenderer::new()?),
        })
    }

    fn form(&self, name: &str) -> Result<&FormConfig, ApiError> {
        self.settings
            .form(name)
            .ok_or_else(|| ApiError::FormNotFound(name.to_string()))
    }

    fn new_session(&self, form: &FormConfig) -> Result<FormSession, ApiError> {
        let defaults = &self.settings.form;
        let ctx = FormContext::new(self.registry.clone(), form.testcases(defaults));
        Ok(FormSession::new(
            ctx,
            &form.schema,
            form.prefix(defaults),
            form.value.as_ref(),
        )?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FormSummary {
    pub name: String,
    pub label: String,
    pub kind: String,
    pub prefix: String,
    pub testcases: usize,
}

/// Patch instructions for the page: append `html` to `table_id` after an
/// add, drop `row_id` after a remove, empty every `cleared` table on reset.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventResponse {
    pub outcome: EventOutcome,
    pub table_id: Option<String>,
    pub row_id: Option<String>,
    pub html: String,
    /// Controls inside `html`
    pub field_names: Vec<String>,
    pub cleared: Vec<String>,
}

impl From<FormChange> for EventResponse {
    fn from(change: FormChange) -> Self {
        let (html, field_names) = match &change.row {
            Some(row) => (row.to_html(), row.field_names()),
            None => (String::new(), Vec::new()),
        };
        Self {
            outcome: change.outcome,
            table_id: change.table_id,
            row_id: change.row_id,
            html,
            field_names,
            cleared: change.cleared,
        }
    }
}

pub async fn list_forms(State(state): State<FormState>) -> Json<Vec<FormSummary>> {
    let defaults = &state.settings.form;
    let forms = state
        .settings
        .forms
        .iter()
        .map(|f| FormSummary {
            name: f.name.clone(),
            label: f.schema.name.clone(),
            kind: f.schema.kind.clone(),
            prefix: f.prefix(defaults).to_string(),
            testcases: f.testcases(defaults),
        })
        .collect();
    Json(forms)
}

/// Render a form page under a fresh session. The session id is embedded in
/// the page and returned in [`SESSION_HEADER`].
pub async fn show_form(
    State(state): State<FormState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let form = state.form(&name)?;
    let session = state.new_session(form)?;
    let content = session.render().to_html();
    let fields = session.field_names().len();
    let session_id = state.store.open(&name, session).await;

    let html = state.pages.render_form(&FormPage {
        title: &form.schema.name,
        description: &form.schema.description,
        form_name: &form.name,
        session_id: &session_id,
        content,
    })?;

    tracing::info!(form = %name, session = %session_id, fields, "rendered form");
    Ok(([(SESSION_HEADER, session_id)], Html(html)))
}

/// Apply an add/remove/reset event to one live session.
pub async fn form_event(
    State(state): State<FormState>,
    Path((name, session_id)): Path<(String, String)>,
    Json(event): Json<FormEvent>,
) -> Result<Json<EventResponse>, ApiError> {
    state.form(&name)?;
    let change = state.store.apply(&name, &session_id, event).await?;
    Ok(Json(change.into()))
}

/// Decode a submitted form back into a value tree. Nothing is stored.
pub async fn submit_form(
    State(state): State<FormState>,
    Path(name): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Json<Value>, ApiError> {
    let form = state.form(&name)?;
    let defaults = &state.settings.form;
    let submission = Submission::new(fields);
    Ok(Json(decode_submission(
        &form.schema,
        form.prefix(defaults),
        &submission,
        form.testcases(defaults),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParamInfo;
    use serde_json::json;

    fn session() -> FormSession {
        let schema = ParamInfo::array("Items", "it", ParamInfo::string("Item", "v"));
        FormSession::new(FormContext::default(), &schema, "", Some(&json!(["a"]))).unwrap()
    }

    #[tokio::test]
    async fn test_oldest_session_is_evicted_at_limit() {
        let store = FormStore::with_limit(2);
        let first = store.open("items", session()).await;
        let second = store.open("items", session()).await;
        let third = store.open("items", session()).await;

        assert_eq!(store.len().await, 2);
        let err = store.apply("items", &first, FormEvent::Reset).await.unwrap_err();
        assert!(matches!(err, ApiError::SessionNotFound(_)));
        assert!(store.apply("items", &second, FormEvent::Reset).await.is_ok());
        assert!(store.apply("items", &third, FormEvent::Reset).await.is_ok());
    }

    #[tokio::test]
    async fn test_session_is_bound_to_its_form() {
        let store = FormStore::new();
        let id = store.open("items", session()).await;

        let err = store.apply("other", &id, FormEvent::Reset).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let change = store
            .apply("items", &id, FormEvent::Add { array: "it".into() })
            .await
            .unwrap();
        assert_eq!(change.outcome, EventOutcome::Applied { index: Some(1) });
    }
}
