//! # grouphub-protocol
//!
//! The wire surface of GroupHub: a line-oriented JSON command protocol
//! served over TCP. Each request line is one `{"type": ..., "data": ...}`
//! envelope; each response line carries a numeric status, a machine code,
//! a human message, and a payload object. Commands are parsed into a typed
//! enum once at the boundary, validated, and dispatched to the service
//! layer.

pub mod command;
pub mod dispatcher;
pub mod request;
pub mod response;
pub mod server;

pub use command::Command;
pub use dispatcher::Dispatcher;
pub use response::Response;
pub use server::ProtocolServer;
