//! Tool catalog + dispatch runtime for the Evolution MCP gateway.
//!
//! This crate is used by the `evolution-mcp` binary. It owns the whole dispatch contract:
//! - the closed [`catalog::Operation`] set (one variant per exposed tool)
//! - input validation against declarative schemas ([`schema`])
//! - pure argument -> HTTP request mapping ([`mapping`])
//! - the remote client capability ([`client`])
//! - uniform result envelopes ([`format`])
//!
//! MCP framing and transports live in the binary.

pub mod catalog;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod listing;
pub mod mapping;
pub mod schema;
pub mod semantics;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use catalog::Operation;
pub use client::{HttpRemoteClient, RemoteClient, RemoteResponse};
pub use config::AmbientConfig;
pub use dispatch::Dispatcher;
pub use error::{Error, RemoteError, Result, ValidationError, Violation};
pub use format::ResultEnvelope;
