//! Data Transfer Objects for REST request/response serialization.
//!
//! Request fields are `Option<String>` so missing values are rejected
//! by handler validation (with the gateway's own error shape) rather
//! than by the JSON extractor.

pub mod outbox_dto;

pub use outbox_dto::*;
