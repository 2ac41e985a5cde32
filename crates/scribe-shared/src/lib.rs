//! # Scribe Shared
//!
//! Wire types of the blog API, kept free of domain and server crates so a
//! client can depend on them alone.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, FieldErrorDto};
