//! Gerrit REST access for the review tools: change-id normalization, a
//! pluggable HTTP transport, response classification, and diff
//! reconstruction.

pub mod auth;
pub mod change_id;
pub mod client;
pub mod diff;
pub mod executor;
pub mod transport;
pub mod types;

pub use client::GerritClient;
pub use gerrit_review_core::error::GerritError;
