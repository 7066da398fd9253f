//! Session-based firewall-management routes.
//!
//! Every route is a JSON `POST`. `login` hands out a session id; all other
//! routes require it in the `X-chkp-sid` header. Errors use the management
//! API's `{code, message, errors[]}` document.

use std::collections::{HashMap, HashSet};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::MockState;

pub const SESSION_HEADER: &str = "x-chkp-sid";
const DEFAULT_SESSION_TIMEOUT: u64 = 600;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Host {
    pub uid: String,
    pub name: String,
    #[serde(rename = "ipv4-address", default)]
    pub ipv4_address: String,
    #[serde(default)]
    pub color: String,
}

/// Everything the firewall routes remember between calls.
#[derive(Debug, Default)]
pub struct FirewallStore {
    pub(crate) sessions: HashSet<String>,
    hosts: HashMap<String, Host>,
    pending_changes: usize,
}

impl FirewallStore {
    fn find(&self, target: &ObjectRef) -> Option<&Host> {
        if let Some(uid) = target.uid.as_deref() {
            return self.hosts.get(uid);
        }
        let name = target.name.as_deref()?;
        self.hosts.values().find(|h| h.name == name)
    }

    fn name_taken(&self, name: &str, except_uid: Option<&str>) -> bool {
        self.hosts
            .values()
            .any(|h| h.name == name && Some(h.uid.as_str()) != except_uid)
    }
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    user: String,
    password: String,
    #[serde(rename = "session-timeout", default)]
    session_timeout: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct AddHost {
    name: String,
    #[serde(rename = "ipv4-address", default)]
    ipv4_address: String,
    #[serde(default)]
    color: String,
}

#[derive(Debug, Default, Deserialize)]
struct ObjectRef {
    name: Option<String>,
    uid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SetHost {
    #[serde(flatten)]
    target: ObjectRef,
    #[serde(rename = "new-name")]
    new_name: Option<String>,
    #[serde(rename = "ipv4-address")]
    ipv4_address: Option<String>,
    color: Option<String>,
}

type Failure = (StatusCode, Json<Value>);

fn failure(status: StatusCode, code: &str, message: &str, errors: &[String]) -> Failure {
    let mut body = json!({ "code": code, "message": message });
    if !errors.is_empty() {
        let list: Vec<Value> = errors.iter().map(|m| json!({ "message": m })).collect();
        body["errors"] = Value::Array(list);
    }
    (status, Json(body))
}

fn object_not_found(target: &ObjectRef) -> Failure {
    let what = target
        .uid
        .as_deref()
        .or(target.name.as_deref())
        .unwrap_or_default();
    failure(
        StatusCode::NOT_FOUND,
        "generic_err_object_not_found",
        &format!("Requested object [{what}] not found"),
        &[],
    )
}

fn duplicate_name(name: &str) -> Failure {
    failure(
        StatusCode::BAD_REQUEST,
        "err_validation_failed",
        "Validation failed with 1 error",
        &[format!("More than one object named '{name}' exists.")],
    )
}

pub(crate) fn routes() -> Router<MockState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/add-host", post(add_host))
        .route("/show-host", post(show_host))
        .route("/set-host", post(set_host))
        .route("/delete-host", post(delete_host))
        .route("/publish", post(publish))
        .route("/discard", post(discard))
}

async fn require_session(state: &MockState, headers: &HeaderMap) -> Result<String, Failure> {
    let sid = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if state.firewall.read().await.sessions.contains(&sid) {
        return Ok(sid);
    }
    let message = format!(
        "Wrong session id [{sid}]. Session may be expired. \
         Please check session id and resubmit the request."
    );
    Err(failure(
        StatusCode::UNAUTHORIZED,
        "generic_err_wrong_session_id",
        &message,
        &[],
    ))
}

async fn login(
    State(state): State<MockState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<Value>, Failure> {
    let (user, password) = state.credentials.as_ref();
    if input.user != *user || input.password != *password {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "err_login_failed",
            "Authentication to server failed.",
            &[],
        ));
    }
    let sid = Uuid::new_v4().to_string();
    state.firewall.write().await.sessions.insert(sid.clone());
    state.record_login();
    tracing::info!(user = %input.user, "session opened");
    Ok(Json(json!({
        "sid": sid,
        "uid": Uuid::new_v4().to_string(),
        "session-timeout": input.session_timeout.unwrap_or(DEFAULT_SESSION_TIMEOUT),
        "read-only": false,
        "standby": false,
    })))
}

async fn logout(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Result<Json<Value>, Failure> {
    let sid = require_session(&state, &headers).await?;
    state.firewall.write().await.sessions.remove(&sid);
    Ok(Json(json!({ "message": "OK" })))
}

async fn add_host(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(input): Json<AddHost>,
) -> Result<Json<Host>, Failure> {
    require_session(&state, &headers).await?;
    let mut store = state.firewall.write().await;
    if store.name_taken(&input.name, None) {
        return Err(duplicate_name(&input.name));
    }
    let host = Host {
        uid: Uuid::new_v4().to_string(),
        name: input.name,
        ipv4_address: input.ipv4_address,
        color: if input.color.is_empty() { "black".to_string() } else { input.color },
    };
    store.hosts.insert(host.uid.clone(), host.clone());
    store.pending_changes += 1;
    Ok(Json(host))
}

async fn show_host(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(target): Json<ObjectRef>,
) -> Result<Json<Host>, Failure> {
    require_session(&state, &headers).await?;
    let store = state.firewall.read().await;
    store.find(&target).cloned().map(Json).ok_or_else(|| object_not_found(&target))
}

async fn set_host(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(input): Json<SetHost>,
) -> Result<Json<Host>, Failure> {
    require_session(&state, &headers).await?;
    let mut store = state.firewall.write().await;
    let uid = match store.find(&input.target) {
        Some(h) => h.uid.clone(),
        None => return Err(object_not_found(&input.target)),
    };
    if let Some(new_name) = input.new_name.as_deref() {
        if store.name_taken(new_name, Some(&uid)) {
            return Err(duplicate_name(new_name));
        }
    }
    store.pending_changes += 1;
    let host = store
        .hosts
        .get_mut(&uid)
        .ok_or_else(|| object_not_found(&input.target))?;
    if let Some(name) = input.new_name {
        host.name = name;
    }
    if let Some(ip) = input.ipv4_address {
        host.ipv4_address = ip;
    }
    if let Some(color) = input.color {
        host.color = color;
    }
    Ok(Json(host.clone()))
}

async fn delete_host(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(target): Json<ObjectRef>,
) -> Result<Json<Value>, Failure> {
    require_session(&state, &headers).await?;
    let mut store = state.firewall.write().await;
    let uid = match store.find(&target) {
        Some(h) => h.uid.clone(),
        None => return Err(object_not_found(&target)),
    };
    store.hosts.remove(&uid);
    store.pending_changes += 1;
    Ok(Json(json!({ "message": "OK" })))
}

async fn publish(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Result<Json<Value>, Failure> {
    require_session(&state, &headers).await?;
    state.firewall.write().await.pending_changes = 0;
    Ok(Json(json!({ "task-id": Uuid::new_v4().to_string() })))
}

async fn discard(
    State(state): State<MockState>,
    headers: HeaderMap,
) -> Result<Json<Value>, Failure> {
    require_session(&state, &headers).await?;
    let mut store = state.firewall.write().await;
    let discarded = std::mem::take(&mut store.pending_changes);
    Ok(Json(json!({
        "number-of-discarded-changes": discarded,
        "message": "OK",
    })))
}
