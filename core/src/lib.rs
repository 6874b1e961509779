//! State store for a to-do list backed by a remote REST collection.
//!
//! # Overview
//! `TodoStore` mirrors the collection locally and exposes four asynchronous
//! operations: fetch the first page, add, delete, and toggle completion. Each
//! performs one round trip and then applies a local mutation.
//!
//! # Design
//! - `TodoClient` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network.
//! - A `Transport` executes the round trip. `UreqTransport` is the real one;
//!   unit tests script responses with `testing::MockTransport`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
#[cfg(test)]
pub mod testing;
pub mod types;

pub use client::TodoClient;
pub use config::StoreConfig;
pub use error::{ApiError, ConfigError, StoreError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use store::{Operation, Status, StoreState, TodoStore};
pub use types::{CompletionPatch, NewTodo, Todo};
