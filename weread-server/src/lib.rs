//! WeRead Server Library
//!
//! HTTP invocation layer over the WeRead tool facade. This module exports the
//! server components for testing and reuse.

pub mod handlers;
pub mod routes;
pub mod state;
