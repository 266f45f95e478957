//! Request/response boundary for the vigil audit store.
//!
//! The transport that carries frames to this crate is someone else's
//! problem; everything here is synchronous byte-in, byte-out. A request
//! frame is one command byte plus little-endian fields, a response frame
//! is one status byte plus a little-endian body.

pub mod error;
pub mod request;
pub mod response;
pub mod engine;

pub use engine::{Engine, StandardEngine};
pub use error::{Result, ServiceError};
