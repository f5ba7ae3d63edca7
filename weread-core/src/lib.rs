//! WeRead Core Library
//!
//! This crate provides the session client for the WeRead reading platform and
//! the tool facade built on it. Remote responses are decoded into the domain
//! records in [`types`] at the client boundary; failures are reported as one
//! of the five [`WereadError`] kinds.

pub mod api;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod tools;
pub mod types;

pub use api::{AuthStatus, ReadingApi};
pub use client::SessionClient;
pub use config::ClientConfig;
pub use credential::Credential;
pub use error::{Result, WereadError};
pub use tools::{tool_definitions, ToolDefinition, WereadTools};
pub use types::{
    Book, BookMetadata, Chapter, Highlight, ReadInfo, ReadingStatus, Review, ReviewKind,
};
