//! Core types for Spark Canvas.
//!
//! This module provides type-safe wrappers for the records exchanged with
//! the Spark Canvas API.

pub mod auth;
pub mod collection;
pub mod id;
pub mod image;
pub mod page;
pub mod user;
pub mod validation;

pub use auth::{AuthResponse, Credentials, Registration};
pub use collection::{Collection, CollectionDetail, NewCollection};
pub use id::*;
pub use image::{Created, HeartCount, Image, ImageUpload, TagCount, parse_tags};
pub use page::Page;
pub use user::User;
pub use validation::ValidationError;
