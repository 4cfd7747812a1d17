//! Stub WebDriver endpoint for session lifecycle tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use authcheck_protocol::ELEMENT_KEY;
use axum::Router;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Default)]
pub struct StubState {
	pub fail_sessions: bool,
	pub not_ready: bool,
	pub next_id: u32,
	pub live: Vec<String>,
	pub created: usize,
	pub deleted: usize,
	pub maximized: usize,
	pub capabilities: Vec<Value>,
	pub url: String,
	pub values: HashMap<String, String>,
	pub clicks: Vec<String>,
}

pub type Shared = Arc<Mutex<StubState>>;

/// A running stub driver.
pub struct StubDriver {
	pub url: String,
	pub state: Shared,
}

impl StubDriver {
	pub async fn start() -> Self {
		Self::start_with(StubState::default()).await
	}

	pub async fn start_with(state: StubState) -> Self {
		let state: Shared = Arc::new(Mutex::new(state));
		let app = Router::new()
			.route("/status", get(status))
			.route("/session", post(create_session))
			.route("/session/{id}", delete(delete_session))
			.route("/session/{id}/url", post(navigate).get(current_url))
			.route("/session/{id}/title", get(title))
			.route("/session/{id}/window/maximize", post(maximize))
			.route("/session/{id}/elements", post(find_elements))
			.route("/session/{id}/element/{eid}/displayed", get(displayed))
			.route("/session/{id}/element/{eid}/enabled", get(enabled))
			.route("/session/{id}/element/{eid}/text", get(text))
			.route("/session/{id}/element/{eid}/clear", post(clear))
			.route("/session/{id}/element/{eid}/value", post(send_keys))
			.route("/session/{id}/element/{eid}/click", post(click))
			.with_state(state.clone());

		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		tokio::spawn(async move {
			axum::serve(listener, app).await.unwrap();
		});

		Self {
			url: format!("http://{addr}"),
			state,
		}
	}
}

type Reply = (StatusCode, Json<Value>);

fn ok(value: Value) -> Reply {
	(StatusCode::OK, Json(json!({ "value": value })))
}

fn fail(status: StatusCode, error: &str, message: &str) -> Reply {
	(
		status,
		Json(json!({ "value": { "error": error, "message": message, "stacktrace": "" } })),
	)
}

fn check_session(state: &StubState, id: &str) -> Result<(), Reply> {
	if state.live.iter().any(|live| live == id) {
		Ok(())
	} else {
		Err(fail(StatusCode::NOT_FOUND, "invalid session id", "invalid session id"))
	}
}

async fn status(State(state): State<Shared>) -> Reply {
	let ready = !state.lock().not_ready;
	ok(json!({ "ready": ready, "message": if ready { "stub ready" } else { "busy" } }))
}

async fn create_session(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
	let mut state = state.lock();
	state.capabilities.push(body);
	if state.fail_sessions {
		return fail(StatusCode::INTERNAL_SERVER_ERROR, "session not created", "Chrome failed to start");
	}
	state.next_id += 1;
	let id = format!("stub-{}", state.next_id);
	state.live.push(id.clone());
	state.created += 1;
	ok(json!({ "sessionId": id, "capabilities": { "browserName": "chrome" } }))
}

async fn delete_session(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
	let mut state = state.lock();
	if let Err(reply) = check_session(&state, &id) {
		return reply;
	}
	state.live.retain(|live| *live != id);
	state.deleted += 1;
	ok(Value::Null)
}

async fn navigate(State(state): State<Shared>, Path(id): Path<String>, Json(body): Json<Value>) -> Reply {
	let mut state = state.lock();
	if let Err(reply) = check_session(&state, &id) {
		return reply;
	}
	state.url = body["url"].as_str().unwrap_or_default().to_string();
	ok(Value::Null)
}

async fn current_url(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
	let state = state.lock();
	if let Err(reply) = check_session(&state, &id) {
		return reply;
	}
	ok(json!(state.url))
}

async fn title(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
	let state = state.lock();
	if let Err(reply) = check_session(&state, &id) {
		return reply;
	}
	ok(json!("MERN Auth App"))
}

async fn maximize(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
	let mut state = state.lock();
	if let Err(reply) = check_session(&state, &id) {
		return reply;
	}
	state.maximized += 1;
	ok(json!({ "x": 0, "y": 0, "width": 1920, "height": 1080 }))
}

/// Knows two elements: the email field and a stale button.
async fn find_elements(State(state): State<Shared>, Path(id): Path<String>, Json(body): Json<Value>) -> Reply {
	let state = state.lock();
	if let Err(reply) = check_session(&state, &id) {
		return reply;
	}
	match (body["using"].as_str(), body["value"].as_str()) {
		(Some("css selector"), Some("[name=\"email\"]")) => ok(json!([{ ELEMENT_KEY: "email-1" }])),
		(Some("xpath"), Some("//button")) => ok(json!([{ ELEMENT_KEY: "stale-1" }])),
		(Some("xpath"), Some("//*[")) => fail(StatusCode::BAD_REQUEST, "invalid selector", "invalid xpath"),
		_ => ok(json!([])),
	}
}

fn element_guard(state: &StubState, id: &str, eid: &str) -> Result<(), Reply> {
	check_session(state, id)?;
	if eid.starts_with("stale") {
		return Err(fail(StatusCode::NOT_FOUND, "stale element reference", "element is not attached to the page document"));
	}
	Ok(())
}

async fn displayed(State(state): State<Shared>, Path((id, eid)): Path<(String, String)>) -> Reply {
	let state = state.lock();
	if let Err(reply) = element_guard(&state, &id, &eid) {
		return reply;
	}
	ok(json!(true))
}

async fn enabled(State(state): State<Shared>, Path((id, eid)): Path<(String, String)>) -> Reply {
	let state = state.lock();
	if let Err(reply) = element_guard(&state, &id, &eid) {
		return reply;
	}
	ok(json!(true))
}

async fn text(State(state): State<Shared>, Path((id, eid)): Path<(String, String)>) -> Reply {
	let state = state.lock();
	if let Err(reply) = element_guard(&state, &id, &eid) {
		return reply;
	}
	ok(json!(state.values.get(&eid).cloned().unwrap_or_default()))
}

async fn clear(State(state): State<Shared>, Path((id, eid)): Path<(String, String)>) -> Reply {
	let mut state = state.lock();
	if let Err(reply) = element_guard(&state, &id, &eid) {
		return reply;
	}
	state.values.insert(eid, String::new());
	ok(Value::Null)
}

async fn send_keys(State(state): State<Shared>, Path((id, eid)): Path<(String, String)>, Json(body): Json<Value>) -> Reply {
	let mut state = state.lock();
	if let Err(reply) = element_guard(&state, &id, &eid) {
		return reply;
	}
	let text = body["text"].as_str().unwrap_or_default().to_string();
	state.values.entry(eid).or_default().push_str(&text);
	ok(Value::Null)
}

async fn click(State(state): State<Shared>, Path((id, eid)): Path<(String, String)>) -> Reply {
	let mut state = state.lock();
	if let Err(reply) = element_guard(&state, &id, &eid) {
		return reply;
	}
	state.clicks.push(eid);
	ok(Value::Null)
}
