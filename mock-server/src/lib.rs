//! In-memory stand-in for the remote todo collection.
//!
//! Implements the subset of the jsonplaceholder `/todos` resource the store
//! talks to: paged list, create, fetch one, partial update, delete. Ids are
//! integers handed out in increasing order.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(default = "default_owner")]
    pub user_id: u64,
    #[serde(default)]
    pub completed: bool,
}

fn default_owner() -> u64 {
    1
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub user_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(rename = "_limit")]
    pub limit: Option<usize>,
}

/// Todos keyed by id, plus the id the next create will receive.
#[derive(Debug)]
pub struct Table {
    todos: BTreeMap<u64, Todo>,
    next_id: u64,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            todos: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Table {
    /// `count` generated items spread across owners 1..=10.
    pub fn seeded(count: u64) -> Self {
        let mut table = Self::default();
        for n in 1..=count {
            table.insert(CreateTodo {
                title: format!("todo {n}"),
                user_id: (n - 1) / 20 + 1,
                completed: n % 3 == 0,
            });
        }
        table
    }

    pub fn insert(&mut self, input: CreateTodo) -> Todo {
        let todo = Todo {
            user_id: input.user_id,
            id: self.next_id,
            title: input.title,
            completed: input.completed,
        };
        self.next_id += 1;
        self.todos.insert(todo.id, todo.clone());
        todo
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}

pub type Db = Arc<RwLock<Table>>;

pub fn app() -> Router {
    router(Db::default())
}

pub fn seeded_app(count: u64) -> Router {
    router(Arc::new(RwLock::new(Table::seeded(count))))
}

pub fn router(db: Db) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock todo server listening");
    }
    axum::serve(listener, router).await
}

async fn list_todos(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Todo>> {
    let table = db.read().await;
    let limit = params.limit.unwrap_or(usize::MAX);
    Json(table.todos.values().take(limit).cloned().collect())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let todo = db.write().await.insert(input);
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Todo>, StatusCode> {
    let table = db.read().await;
    table.todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut table = db.write().await;
    let todo = table.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    if let Some(user_id) = input.user_id {
        todo.user_id = user_id;
    }
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut table = db.write().await;
    table.todos.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_camel_case_owner() {
        let todo = Todo {
            user_id: 1,
            id: 3,
            title: "Test".to_string(),
            completed: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["id"], 3);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn create_todo_defaults_owner_and_completed() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"No extras"}"#).unwrap();
        assert_eq!(input.title, "No extras");
        assert_eq!(input.user_id, 1);
        assert!(!input.completed);
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.completed.is_none());
        assert!(input.user_id.is_none());
    }

    #[test]
    fn table_hands_out_increasing_ids() {
        let mut table = Table::default();
        assert!(table.is_empty());
        let a = table.insert(CreateTodo {
            title: "a".to_string(),
            user_id: 1,
            completed: false,
        });
        let b = table.insert(CreateTodo {
            title: "b".to_string(),
            user_id: 1,
            completed: false,
        });
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn seeded_table_continues_after_seed() {
        let mut table = Table::seeded(25);
        assert_eq!(table.len(), 25);
        assert_eq!(table.todos[&21].user_id, 2);
        let next = table.insert(CreateTodo {
            title: "next".to_string(),
            user_id: 1,
            completed: false,
        });
        assert_eq!(next.id, 26);
    }
}
