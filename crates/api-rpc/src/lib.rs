//! JSON-RPC API Layer
//!
//! Implements the JSON-RPC 2.0 server for Queueboard. HTTP and WebSocket
//! share one port; the display feed is a WebSocket subscription.

pub mod error;
mod feed;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::RpcHandler;
pub use server::{RpcServer, RpcServerConfig};
