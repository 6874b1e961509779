//! Local mirror of the remote todo collection.
//!
//! # Design
//! `TodoStore` is a cheap, cloneable handle owned by the application root and
//! injected wherever state is read or an operation is dispatched. The state
//! itself lives in a `watch` channel so observers are notified after every
//! mutation.
//!
//! Every operation mutates state at most twice: once before its single await
//! on the transport, and once after it resumes. Nothing is borrowed across the
//! await, so several operations may be in flight at once. They race on
//! `status` and `error` and the last one to resume wins.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::config::StoreConfig;
use crate::error::{ApiError, ConfigError, StoreError};
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{NewTodo, Todo};

/// The four state-mutating network actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchList,
    AddItem,
    DeleteItem,
    ToggleCompletion,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::FetchList => "fetch_list",
            Operation::AddItem => "add_item",
            Operation::DeleteItem => "delete_item",
            Operation::ToggleCompletion => "toggle_completion",
        }
    }

    /// Message recorded when the server answers with a non-2xx status.
    pub fn server_error_message(self) -> &'static str {
        match self {
            Operation::FetchList => "ServerError!",
            Operation::AddItem => "Can't add task. Server error.",
            Operation::DeleteItem => "Can't delete task. Server error.",
            Operation::ToggleCompletion => "Can't toggle status. Server error.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request status. Only `fetch_list` walks the full cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Resolved,
    Rejected,
}

/// Everything a view needs to render the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreState {
    pub items: Vec<Todo>,
    pub status: Status,
    pub error: Option<String>,
}

impl StoreState {
    pub fn get(&self, id: u64) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == id)
    }

    /// Append `todo`. An existing entry with the same id is dropped first.
    pub fn push(&mut self, todo: Todo) {
        self.items.retain(|t| t.id != todo.id);
        self.items.push(todo);
    }

    pub fn remove(&mut self, id: u64) -> Option<Todo> {
        let index = self.items.iter().position(|t| t.id == id)?;
        Some(self.items.remove(index))
    }

    /// Flip `completed` on the item with `id`, returning the new value.
    pub fn toggle(&mut self, id: u64) -> Option<bool> {
        let todo = self.items.iter_mut().find(|t| t.id == id)?;
        todo.completed = !todo.completed;
        Some(todo.completed)
    }

    fn reject(&mut self, message: String) {
        self.status = Status::Rejected;
        self.error = Some(message);
    }
}

pub struct TodoStore<T = UreqTransport> {
    client: TodoClient,
    transport: Arc<T>,
    page_size: usize,
    owner_id: u64,
    state: Arc<watch::Sender<StoreState>>,
}

impl<T> Clone for TodoStore<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: Arc::clone(&self.transport),
            page_size: self.page_size,
            owner_id: self.owner_id,
            state: Arc::clone(&self.state),
        }
    }
}

impl TodoStore<UreqTransport> {
    /// Store talking to `config.base_url` over real HTTP.
    pub fn new(config: StoreConfig) -> Result<Self, ConfigError> {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> TodoStore<T> {
    pub fn with_transport(config: StoreConfig, transport: T) -> Result<Self, ConfigError> {
        Self::with_shared_transport(config, Arc::new(transport))
    }

    /// Fails if `config` does not pass [`StoreConfig::validate`].
    pub fn with_shared_transport(config: StoreConfig, transport: Arc<T>) -> Result<Self, ConfigError> {
        config.validate()?;
        let (state, _) = watch::channel(StoreState::default());
        Ok(Self {
            client: TodoClient::new(&config.base_url),
            transport,
            page_size: config.page_size,
            owner_id: config.owner_id,
            state: Arc::new(state),
        })
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state mutation.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn items(&self) -> Vec<Todo> {
        self.state.borrow().items.clone()
    }

    pub fn status(&self) -> Status {
        self.state.borrow().status
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Replace the local list with the first page of the collection.
    pub async fn fetch_list(&self) -> Result<(), StoreError> {
        let operation = Operation::FetchList;
        self.state.send_modify(|s| {
            s.status = Status::Loading;
            s.error = None;
        });

        let request = Ok(self.client.build_list_todos(self.page_size));
        match self.exchange(request, TodoClient::parse_list_todos).await {
            Ok(items) => {
                let items = dedup_by_id(items);
                debug!(%operation, count = items.len(), "list loaded");
                self.state.send_modify(|s| {
                    s.items = items;
                    s.status = Status::Resolved;
                    s.error = None;
                });
                Ok(())
            }
            Err(err) => {
                let rejection = self.rejected(operation, &err);
                self.state.send_modify(|s| s.reject(rejection.to_string()));
                Err(rejection)
            }
        }
    }

    /// Create an item owned by the configured owner and append the server's copy.
    ///
    /// A failure is returned to the caller but leaves `status` and `error` alone.
    pub async fn add_item(&self, title: impl Into<String>) -> Result<Todo, StoreError> {
        let operation = Operation::AddItem;
        let input = NewTodo {
            title: title.into(),
            user_id: self.owner_id,
            completed: false,
        };

        let request = self.client.build_create_todo(&input);
        match self.exchange(request, TodoClient::parse_create_todo).await {
            Ok(todo) => {
                debug!(%operation, id = todo.id, "item created");
                self.state.send_modify(|s| s.push(todo.clone()));
                Ok(todo)
            }
            Err(err) => Err(self.rejected(operation, &err)),
        }
    }

    /// Delete `id` remotely, then locally.
    ///
    /// Failures are logged and dropped: local state is untouched and the
    /// caller is not told.
    pub async fn delete_item(&self, id: u64) {
        let operation = Operation::DeleteItem;
        let request = Ok(self.client.build_delete_todo(id));
        match self.exchange(request, TodoClient::parse_delete_todo).await {
            Ok(()) => {
                debug!(%operation, id, "item deleted");
                self.state.send_modify(|s| {
                    s.remove(id);
                });
            }
            Err(err) => {
                let _ = self.rejected(operation, &err);
            }
        }
    }

    /// Flip the completion flag of a local item on the server, then locally.
    ///
    /// Fails fast with `UnknownItem` if `id` is not in the store.
    pub async fn toggle_completion(&self, id: u64) -> Result<(), StoreError> {
        let operation = Operation::ToggleCompletion;
        let current = self.state.borrow().get(id).map(|t| t.completed);
        let Some(current) = current else {
            warn!(%operation, id, "toggle requested for unknown item");
            return Err(StoreError::UnknownItem(id));
        };

        let request = self.client.build_set_completed(id, !current);
        match self.exchange(request, TodoClient::parse_set_completed).await {
            Ok(()) => {
                self.state.send_if_modified(|s| match s.toggle(id) {
                    Some(completed) => {
                        debug!(%operation, id, completed, "item toggled");
                        true
                    }
                    None => {
                        warn!(%operation, id, "item removed before toggle completed");
                        false
                    }
                });
                Ok(())
            }
            Err(err) => {
                let rejection = self.rejected(operation, &err);
                self.state.send_modify(|s| s.reject(rejection.to_string()));
                Err(rejection)
            }
        }
    }

    async fn exchange<R>(
        &self,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&TodoClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let response = self.transport.execute(request?).await?;
        parse(&self.client, response)
    }

    fn rejected(&self, operation: Operation, err: &ApiError) -> StoreError {
        let rejection = StoreError::rejected(operation, err);
        warn!(%operation, error = %err, reason = %rejection, "operation rejected");
        rejection
    }
}

/// Keep the first occurrence of each id.
fn dedup_by_id(items: Vec<Todo>) -> Vec<Todo> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|t| seen.insert(t.id)).collect()
}
