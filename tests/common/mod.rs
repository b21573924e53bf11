// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::{
    extract::{Form, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use strava_insights::config::Config;
use strava_insights::db::InsightStore;
use strava_insights::error::AppError;
use strava_insights::models::{
    Activity, ActivityType, ConversationMessage, ModelTurn, ToolCall, ToolSchema,
};
use strava_insights::routes::create_router;
use strava_insights::services::{
    ActivityCache, ActivitySource, AnalysisOrchestrator, ChatModel, ToolRegistry,
};
use strava_insights::AppState;

/// Serve a router on an ephemeral local port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test server failed");
    });
    format!("http://{}", addr)
}

/// Build an activity with the fields the tools read.
#[allow(dead_code)]
pub fn activity(id: u64, activity_type: &str, distance: f64, speed: f64, date: &str) -> Activity {
    Activity {
        id,
        name: format!("Activity {}", id),
        activity_type: ActivityType::from(activity_type.to_string()),
        distance,
        moving_time: 1800.0,
        average_speed: speed,
        max_speed: speed * 1.5,
        total_elevation_gain: 50.0,
        start_date_local: date.to_string(),
    }
}

/// Strava-shaped JSON for an activity list entry.
#[allow(dead_code)]
pub fn activity_json(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("Activity {}", id),
        "type": "Ride",
        "sport_type": "Ride",
        "distance": 1000.0 * id as f64,
        "moving_time": 600,
        "average_speed": 5.0,
        "max_speed": 9.0,
        "total_elevation_gain": 10.0,
        "start_date_local": "2025-01-01T08:00:00Z"
    })
}

// ─── Fake Strava ─────────────────────────────────────────────

/// In-process stand-in for the Strava API and OAuth token endpoint.
#[allow(dead_code)]
pub struct FakeStrava {
    activities: Vec<Value>,
    valid_tokens: Mutex<HashSet<String>>,
    /// Whether tokens issued by a refresh are accepted afterwards
    accept_refreshed: bool,
    /// Stop accepting every token after this page has been served
    revoke_after_page: Option<u32>,
    /// Return this status for the given page
    error_on_page: Option<(u32, u16)>,
    refresh_count: AtomicUsize,
    /// (page, bearer token) for every list request
    pub page_requests: Mutex<Vec<(u32, String)>>,
    /// Refresh tokens presented to the token endpoint
    pub refresh_tokens_seen: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeStrava {
    pub fn new(activity_count: u64, valid_token: &str) -> Self {
        Self {
            activities: (1..=activity_count).map(activity_json).collect(),
            valid_tokens: Mutex::new(HashSet::from([valid_token.to_string()])),
            accept_refreshed: true,
            revoke_after_page: None,
            error_on_page: None,
            refresh_count: AtomicUsize::new(0),
            page_requests: Mutex::new(Vec::new()),
            refresh_tokens_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn reject_refreshed_tokens(mut self) -> Self {
        self.accept_refreshed = false;
        self
    }

    pub fn revoke_after_page(mut self, page: u32) -> Self {
        self.revoke_after_page = Some(page);
        self
    }

    pub fn error_on_page(mut self, page: u32, status: u16) -> Self {
        self.error_on_page = Some((page, status));
        self
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_count.load(Ordering::SeqCst)
    }

    pub fn pages_requested(&self) -> Vec<u32> {
        self.page_requests
            .lock()
            .unwrap()
            .iter()
            .map(|(page, _)| *page)
            .collect()
    }

    /// Start serving; returns (api base URL, token URL).
    pub async fn start(self: &Arc<Self>) -> (String, String) {
        let router = Router::new()
            .route("/api/v3/athlete/activities", get(list_activities))
            .route("/oauth/token", post(refresh_token))
            .with_state(self.clone());
        let base = spawn_server(router).await;
        (format!("{}/api/v3", base), format!("{}/oauth/token", base))
    }
}

#[derive(Deserialize)]
struct PageQuery {
    page: u32,
    per_page: usize,
}

async fn list_activities(
    State(fake): State<Arc<FakeStrava>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string();

    fake.page_requests
        .lock()
        .unwrap()
        .push((query.page, token.clone()));

    if !fake.valid_tokens.lock().unwrap().contains(&token) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Authorization Error" })),
        );
    }

    if let Some((page, status)) = fake.error_on_page {
        if page == query.page {
            let status = StatusCode::from_u16(status).unwrap();
            return (status, Json(json!({ "message": "Upstream failure" })));
        }
    }

    let start = (query.page as usize - 1) * query.per_page;
    let batch: Vec<Value> = fake
        .activities
        .iter()
        .skip(start)
        .take(query.per_page)
        .cloned()
        .collect();

    if fake.revoke_after_page == Some(query.page) {
        fake.valid_tokens.lock().unwrap().clear();
    }

    (StatusCode::OK, Json(Value::Array(batch)))
}

async fn refresh_token(
    State(fake): State<Arc<FakeStrava>>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let n = fake.refresh_count.fetch_add(1, Ordering::SeqCst) + 1;
    fake.refresh_tokens_seen
        .lock()
        .unwrap()
        .push(form.get("refresh_token").cloned().unwrap_or_default());

    if form.get("grant_type").map(String::as_str) != Some("refresh_token") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Bad Request" })),
        );
    }

    let access_token = format!("refreshed_access_{}", n);
    if fake.accept_refreshed {
        fake.valid_tokens
            .lock()
            .unwrap()
            .insert(access_token.clone());
    }

    (
        StatusCode::OK,
        Json(json!({
            "token_type": "Bearer",
            "access_token": access_token,
            "refresh_token": format!("refreshed_refresh_{}", n),
            "expires_at": 1_900_000_000i64,
            "expires_in": 21600
        })),
    )
}

// ─── Fake model service ──────────────────────────────────────

/// In-process stand-in for an OpenAI-compatible chat completions endpoint.
#[allow(dead_code)]
pub struct FakeLlm {
    responses: Mutex<VecDeque<(u16, Value)>>,
    /// Request bodies received, in order
    pub requests: Mutex<Vec<Value>>,
    /// Authorization headers received, in order
    pub auth_headers: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeLlm {
    pub fn new(responses: Vec<(u16, Value)>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            auth_headers: Mutex::new(Vec::new()),
        })
    }

    /// Start serving; returns the API base URL.
    pub async fn start(self: &Arc<Self>) -> String {
        let router = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(self.clone());
        format!("{}/v1", spawn_server(router).await)
    }

    pub fn request(&self, index: usize) -> Value {
        self.requests.lock().unwrap()[index].clone()
    }
}

async fn chat_completions(
    State(fake): State<Arc<FakeLlm>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    fake.requests.lock().unwrap().push(body);
    fake.auth_headers.lock().unwrap().push(
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
    );

    let (status, body) = fake.responses.lock().unwrap().pop_front().unwrap_or((
        500,
        json!({ "error": { "message": "No scripted response" } }),
    ));
    (StatusCode::from_u16(status).unwrap(), Json(body))
}

/// OpenAI-style success body with plain text.
#[allow(dead_code)]
pub fn text_completion(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    })
}

/// OpenAI-style success body with tool calls `(name, arguments JSON string)`.
#[allow(dead_code)]
pub fn tool_call_completion(calls: &[(&str, &str)]) -> Value {
    let tool_calls: Vec<Value> = calls
        .iter()
        .enumerate()
        .map(|(i, (name, arguments))| {
            json!({
                "id": format!("call_{}", i),
                "type": "function",
                "function": { "name": name, "arguments": arguments }
            })
        })
        .collect();

    json!({
        "id": "chatcmpl-test",
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": null, "tool_calls": tool_calls },
            "finish_reason": "tool_calls"
        }]
    })
}

// ─── Scripted model ──────────────────────────────────────────

/// One recorded call to the scripted model.
#[allow(dead_code)]
#[derive(Clone)]
pub struct RecordedCall {
    pub messages: Vec<ConversationMessage>,
    pub with_tools: bool,
}

/// Chat model that replays a fixed script of turns.
#[allow(dead_code)]
pub struct ScriptedModel {
    turns: Mutex<VecDeque<Result<ModelTurn, AppError>>>,
    /// Returned forever once the script runs out
    repeat: Option<ModelTurn>,
    pub calls: Mutex<Vec<RecordedCall>>,
}

#[allow(dead_code)]
impl ScriptedModel {
    pub fn new(turns: Vec<Result<ModelTurn, AppError>>) -> Arc<Self> {
        Arc::new(Self {
            turns: Mutex::new(turns.into()),
            repeat: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn repeating(turn: ModelTurn) -> Arc<Self> {
        Arc::new(Self {
            turns: Mutex::new(VecDeque::new()),
            repeat: Some(turn),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call(&self, index: usize) -> RecordedCall {
        self.calls.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(
        &self,
        messages: &[ConversationMessage],
        tools: Option<&[ToolSchema]>,
    ) -> Result<ModelTurn, AppError> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            with_tools: tools.is_some(),
        });

        match self.turns.lock().unwrap().pop_front() {
            Some(turn) => turn,
            None => self
                .repeat
                .clone()
                .ok_or_else(|| AppError::Llm("Script exhausted".to_string())),
        }
    }
}

/// A tool-call turn.
#[allow(dead_code)]
pub fn tool_turn(calls: &[(&str, Value)]) -> ModelTurn {
    ModelTurn::ToolCalls {
        content: None,
        calls: calls
            .iter()
            .enumerate()
            .map(|(i, (name, arguments))| ToolCall {
                id: format!("call_{}", i),
                name: name.to_string(),
                arguments: arguments.clone(),
            })
            .collect(),
    }
}

// ─── Activity source ─────────────────────────────────────────

/// Activity source serving a fixed history and counting fetches.
#[allow(dead_code)]
pub struct StaticSource {
    activities: Vec<Activity>,
    fetches: AtomicUsize,
}

#[allow(dead_code)]
impl StaticSource {
    pub fn new(activities: Vec<Activity>) -> Arc<Self> {
        Arc::new(Self {
            activities,
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActivitySource for StaticSource {
    async fn fetch_all_activities(&self) -> Result<Vec<Activity>, AppError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.activities.clone())
    }
}

/// Orchestrator over a scripted model and a fixed history.
#[allow(dead_code)]
pub fn test_orchestrator(
    model: Arc<ScriptedModel>,
    source: Arc<StaticSource>,
) -> AnalysisOrchestrator {
    let config = Config::test_default();
    let cache = ActivityCache::new(source, config.activity_cache_ttl);
    AnalysisOrchestrator::new(model, ToolRegistry::new(cache))
}

/// Create a test app with offline fakes.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(
    model: Arc<ScriptedModel>,
    activities: Vec<Activity>,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        orchestrator: test_orchestrator(model, StaticSource::new(activities)),
        insights: InsightStore::new(),
    });

    (create_router(state.clone()), state)
}
