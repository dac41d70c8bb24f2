//! caption-core - Core traits and types for the caption relay
//!
//! This crate provides the abstraction the HTTP layer talks to when it
//! forwards an uploaded image. The real implementation lives in
//! `caption-upstream`; tests plug in their own backends.

pub mod backend;
pub mod error;

pub use backend::{CaptionBackend, UpstreamReply};
pub use error::{BackendError, BackendResult};
