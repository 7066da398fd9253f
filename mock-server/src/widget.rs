//! Widget CRUD routes, answering errors in the Spring `{error, message}` shape.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MockState;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Widget {
    pub id: String,
    pub uid: String,
    pub name: String,
    pub size: String,
}

#[derive(Debug, Deserialize)]
pub struct WidgetNew {
    pub name: String,
    #[serde(default)]
    pub size: String,
}

#[derive(Debug, Serialize)]
struct SpringError {
    error: String,
    message: String,
}

type Failure = (StatusCode, Json<SpringError>);

fn failure(status: StatusCode, message: String) -> Failure {
    let error = status.canonical_reason().unwrap_or("Error").to_string();
    (status, Json(SpringError { error, message }))
}

fn not_found(id: &str) -> Failure {
    failure(StatusCode::NOT_FOUND, format!("widget {id} not found"))
}

pub(crate) fn routes() -> Router<MockState> {
    Router::new()
        .route("/widget", post(create_widget))
        .route(
            "/widget/{id}",
            get(get_widget).post(update_widget).delete(delete_widget),
        )
}

async fn create_widget(
    State(state): State<MockState>,
    Json(input): Json<WidgetNew>,
) -> Result<Json<Widget>, Failure> {
    if input.name.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "name is required".to_string()));
    }
    let widget = Widget {
        id: Uuid::new_v4().to_string(),
        uid: Uuid::new_v4().to_string(),
        name: input.name,
        size: input.size,
    };
    state
        .widgets
        .write()
        .await
        .insert(widget.id.clone(), widget.clone());
    Ok(Json(widget))
}

async fn get_widget(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> Result<Json<Widget>, Failure> {
    let widgets = state.widgets.read().await;
    widgets.get(&id).cloned().map(Json).ok_or_else(|| not_found(&id))
}

async fn update_widget(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(input): Json<WidgetNew>,
) -> Result<Json<Widget>, Failure> {
    if input.name.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "name is required".to_string()));
    }
    let mut widgets = state.widgets.write().await;
    let widget = widgets.get_mut(&id).ok_or_else(|| not_found(&id))?;
    widget.name = input.name;
    widget.size = input.size;
    Ok(Json(widget.clone()))
}

async fn delete_widget(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> Result<StatusCode, Failure> {
    let mut widgets = state.widgets.write().await;
    widgets
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found(&id))
}
