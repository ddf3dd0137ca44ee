//! Request handlers for the synthesiser form.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};

use super::view::BrowseQuery;
use super::AppState;
use crate::session::{Category, Notice, PromptKey, SessionId, SessionState, Synthesis};

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "brand_synth_session";

/// Form body of a category generate action. An absent `prompt` field keeps
/// the session's current prompt; a present but empty one is stored as is.
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub input: String,
    pub prompt: Option<String>,
}

/// Form body of the final generate action.
#[derive(Debug, Deserialize)]
pub struct FinalForm {
    pub prompt: Option<String>,
}

/// JSON view of one session. `session_id` is `None` when the caller has no
/// live session; the rest then shows the defaults a new session starts with.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Option<String>,
    pub outputs: HashMap<Category, Vec<Synthesis>>,
    pub prompts: HashMap<String, String>,
    pub final_output: String,
    pub ready: bool,
}

impl SessionSnapshot {
    fn from_state(id: Option<SessionId>, state: &SessionState) -> Self {
        let outputs = Category::ALL
            .into_iter()
            .map(|c| (c, state.outputs(c).to_vec()))
            .collect();
        let mut prompts: HashMap<String, String> = Category::ALL
            .into_iter()
            .map(|c| (c.slug().to_string(), state.prompt(c).to_string()))
            .collect();
        prompts.insert("final".to_string(), state.prompt(PromptKey::Final).to_string());

        Self {
            session_id: id.map(|id| id.to_string()),
            outputs,
            prompts,
            final_output: state.final_output().to_string(),
            ready: state.all_categories_ready(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Render the form. Browsing is a pure read of the session; only the
/// pending notice is consumed. Visitors without a session see a blank form
/// and get no cookie until they submit something.
pub async fn index(
    State(app): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(browse): Query<BrowseQuery>,
) -> Response {
    match app.sessions.get(session_id_from(&headers)).await {
        Some(session) => {
            let mut state = session.lock().await;
            let notice = state.take_flash();
            render(&app, &state, &browse, notice.as_ref())
        }
        None => render(&app, &app.sessions.blank_state(), &browse, None),
    }
}

/// Generate a synthesis for one category, then redirect back to its tab.
pub async fn generate(
    State(app): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Form(form): Form<GenerateForm>,
) -> Response {
    let Ok(category) = slug.parse::<Category>() else {
        return (StatusCode::NOT_FOUND, format!("Unknown section '{}'", slug)).into_response();
    };

    let (id, session, created) = app.sessions.get_or_create(session_id_from(&headers)).await;
    let mut state = session.lock().await;

    let outcome = app
        .synth
        .generate_category(&mut state, category, &form.input, form.prompt.as_deref())
        .await;

    let notice = match &outcome {
        Ok(_) => Notice::success(format!("{} synthesis generated.", category)),
        Err(e) => Notice::from(e),
    };
    state.set_flash(notice);

    let redirect = Redirect::to(&format!("/?tab={}", category.slug())).into_response();
    with_session_cookie(redirect, id, created)
}

/// Generate the final synthesis, then redirect back to the final tab.
/// Refused with the placeholder notice until every category has a synthesis.
pub async fn generate_final(
    State(app): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<FinalForm>,
) -> Response {
    let (id, session, created) = app.sessions.get_or_create(session_id_from(&headers)).await;
    let mut state = session.lock().await;

    let outcome = app
        .synth
        .generate_final(&mut state, form.prompt.as_deref())
        .await;

    let notice = match &outcome {
        Ok(_) => Notice::success("Final synthesis generated."),
        Err(e) => Notice::from(e),
    };
    state.set_flash(notice);

    with_session_cookie(Redirect::to("/?tab=final").into_response(), id, created)
}

/// JSON snapshot of the caller's session. Never creates one.
pub async fn session_snapshot(State(app): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let id = session_id_from(&headers);
    let snapshot = match app.sessions.get(id).await {
        Some(session) => SessionSnapshot::from_state(id, &*session.lock().await),
        None => SessionSnapshot::from_state(None, &app.sessions.blank_state()),
    };
    Json(snapshot).into_response()
}

fn render(
    app: &AppState,
    state: &SessionState,
    browse: &BrowseQuery,
    notice: Option<&Notice>,
) -> Response {
    match app.view.render_page(state, browse, notice) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = ?e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

/// Extract the session id from the `Cookie` header(s), if present and valid.
pub fn session_id_from(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.parse().ok())
}

fn with_session_cookie(mut response: Response, id: SessionId, created: bool) -> Response {
    if created {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "Invalid session cookie value"),
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_from_cookie_header() {
        let id = SessionId::new();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, id))
                .expect("valid header"),
        );
        assert_eq!(session_id_from(&headers), Some(id));
    }

    #[test]
    fn test_session_id_missing_or_garbage() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id_from(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("brand_synth_session=not-a-uuid"),
        );
        assert_eq!(session_id_from(&headers), None);
    }

    #[test]
    fn test_cookie_only_set_for_new_sessions() {
        let id = SessionId::new();
        let fresh = with_session_cookie(StatusCode::OK.into_response(), id, true);
        let cookie = fresh
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("cookie set");
        assert!(cookie.starts_with(&format!("{}={}", SESSION_COOKIE, id)));
        assert!(cookie.contains("HttpOnly"));

        let existing = with_session_cookie(StatusCode::OK.into_response(), id, false);
        assert!(existing.headers().get(header::SET_COOKIE).is_none());
    }
}
