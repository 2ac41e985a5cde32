//! # Scribe Core
//!
//! The domain layer of the Scribe blog.
//! This crate contains the entities, the ports infrastructure must implement,
//! and the post discovery and ranking pipeline. It has no infrastructure
//! dependencies.

pub mod domain;
pub mod error;
pub mod feed;
pub mod forms;
pub mod markdown;
pub mod pagination;
pub mod ports;
pub mod query;
pub mod ranking;
pub mod services;
pub mod trigram;

pub use error::{DomainError, RepoError};
pub use query::PostQuery;
pub use services::{DiscoveryLimits, Interactions, PostDiscovery};
