//! Spark Canvas API client.
//!
//! Every request to the Spark Canvas API goes through [`ApiClient`], which
//! injects the session's bearer token and reacts to a rejected session (401)
//! by clearing it and notifying an [`UnauthorizedHandler`].
//!
//! # Example
//!
//! ```rust,ignore
//! use spark_canvas_client::{ApiClient, ClientConfig, History, LoginRedirect, Session};
//! use spark_canvas_client::core::Page;
//! use std::sync::Arc;
//!
//! let config = ClientConfig::from_env()?;
//! let history = Arc::new(History::new("/upload"));
//! let client = ApiClient::builder(config.clone())
//!     .session(Session::in_memory())
//!     .on_unauthorized(LoginRedirect::new(Arc::clone(&history), config.login_path))
//!     .build()?;
//!
//! let images = client.list_images(Page::default()).await?;
//! ```
//!
//! # Modules
//!
//! - [`client`] - Request pipeline (URL resolution, auth header, 401 handling)
//! - [`session`] - Token and profile storage
//! - [`navigation`] - Unauthorized hook and login redirect policy
//! - [`loader`] - Observable list loading state
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod loader;
pub mod navigation;
pub mod session;

pub use client::{ApiClient, ApiClientBuilder, RequestOptions};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, GENERIC_ERROR_MESSAGE};
pub use loader::{ListLoader, ListState};
pub use navigation::{
    History, LoginRedirect, Navigator, Unauthorized, UnauthorizedHandler, post_login_destination,
};
pub use reqwest::{Method, StatusCode};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionError, SessionStore};
pub use spark_canvas_core as core;
