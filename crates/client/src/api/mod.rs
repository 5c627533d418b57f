//! Typed calls for each Spark Canvas endpoint.
//!
//! Each submodule adds an `impl ApiClient` block for one resource. All calls
//! go through the shared pipeline in [`crate::client`], so they inherit token
//! injection and 401 handling.

mod auth;
mod collections;
mod images;
mod users;

/// Decode a list body the server may send as JSON `null` when empty.
pub(crate) fn list_or_empty<T>(items: Option<Vec<T>>) -> Vec<T> {
    items.unwrap_or_default()
}
