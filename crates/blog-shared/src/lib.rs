//! # Blog Shared
//!
//! Request/response types of the HTTP API. Kept free of server crates so a
//! client (native or WASM) can depend on it alone.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, MessageResponse};
