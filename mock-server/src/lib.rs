//! In-memory server for the action-parameter object protocol.
//!
//! Every resource is a file-like path (`/Widget.json`, `/Widget.mustache`);
//! the part before the first `.` names the resource and the extension is
//! ignored. The `_action` query parameter selects the behavior and all other
//! parameters are criteria (Load, List) or fields (Create, Commit). Values are
//! stored as strings, as the client sends them.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub const ACTION_PARAM: &str = "_action";

pub type Row = Map<String, Value>;

/// Resource name to rows, in insertion order.
pub type Db = Arc<RwLock<HashMap<String, Vec<Row>>>>;

pub fn app() -> Router {
    app_with_db(Db::default())
}

/// Router over an existing store, so tests can seed or inspect it.
pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/{file}", get(dispatch))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Insert `rows` for `resource` as if they had been created by clients.
pub async fn seed(db: &Db, resource: &str, rows: Vec<Row>) {
    db.write()
        .await
        .entry(resource.to_string())
        .or_default()
        .extend(rows);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Load,
    List,
    Create,
    Commit,
    Delete,
}

impl Action {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Load" => Some(Action::Load),
            "List" => Some(Action::List),
            "Create" => Some(Action::Create),
            "Commit" => Some(Action::Commit),
            "Delete" => Some(Action::Delete),
            _ => None,
        }
    }
}

async fn dispatch(
    State(db): State<Db>,
    Path(file): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let resource = file.split('.').next().unwrap_or_default().to_string();

    let mut action = None;
    let mut fields = Vec::new();
    for (key, value) in params {
        if key == ACTION_PARAM {
            action = Some(value);
        } else {
            fields.push((key, value));
        }
    }
    let Some(raw_action) = action else {
        return (StatusCode::BAD_REQUEST, "missing _action").into_response();
    };
    let Some(action) = Action::parse(&raw_action) else {
        return (StatusCode::BAD_REQUEST, format!("unknown action {raw_action}")).into_response();
    };
    debug!(%resource, ?action, fields = fields.len(), "handling request");

    match action {
        Action::Load | Action::List => {
            let store = db.read().await;
            let rows: Vec<Row> = store
                .get(&resource)
                .map(|rows| {
                    rows.iter()
                        .filter(|row| matches_all(row, &fields))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            result_sets(rows)
        }
        Action::Create => {
            let mut row = Row::new();
            row.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
            for (key, value) in fields {
                if key != "id" {
                    row.insert(key, Value::String(value));
                }
            }
            db.write()
                .await
                .entry(resource)
                .or_default()
                .push(row.clone());
            result_sets(vec![row])
        }
        Action::Commit => {
            let Some(id) = field(&fields, "id") else {
                return status(2, "missing id");
            };
            let mut store = db.write().await;
            let row = store
                .get_mut(&resource)
                .and_then(|rows| rows.iter_mut().find(|row| has_id(row, &id)));
            match row {
                Some(row) => {
                    for (key, value) in fields.into_iter().filter(|(k, _)| k != "id") {
                        row.insert(key, Value::String(value));
                    }
                    status(0, "committed")
                }
                None => status(1, "not found"),
            }
        }
        Action::Delete => {
            let Some(id) = field(&fields, "id") else {
                return status(2, "missing id");
            };
            let mut store = db.write().await;
            let Some(rows) = store.get_mut(&resource) else {
                return status(1, "not found");
            };
            let before = rows.len();
            rows.retain(|row| !has_id(row, &id));
            if rows.len() < before {
                status(0, "deleted")
            } else {
                status(1, "not found")
            }
        }
    }
}

fn result_sets(rows: Vec<Row>) -> Response {
    Json(json!({ "resultSets": rows })).into_response()
}

fn status(code: i64, message: &str) -> Response {
    Json(json!({ "resultCode": code.to_string(), "resultMsg": message })).into_response()
}

fn field(fields: &[(String, String)], name: &str) -> Option<String> {
    fields
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
}

fn has_id(row: &Row, id: &str) -> bool {
    row.get("id").and_then(Value::as_str) == Some(id)
}

fn matches_all(row: &Row, criteria: &[(String, String)]) -> bool {
    criteria.iter().all(|(key, expected)| match row.get(key) {
        Some(Value::String(actual)) => actual == expected,
        Some(other) => other.to_string() == *expected,
        None => false,
    })
}
