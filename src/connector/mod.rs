//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Embedding generation (ONNX Runtime, plus an offline mock)
//! - Storage (JSON file, in-memory)
//! - Answer generation (Anthropic Messages API, plus an offline mock)
//! - Entry points (CLI controllers and the HTTP API)

pub mod adapter;
pub mod api;
pub mod http;

pub use adapter::*;
pub use api::{Container, ContainerConfig, Router};
