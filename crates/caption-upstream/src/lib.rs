//! caption-upstream - Upstream vision API backend
//!
//! Implements `CaptionBackend` by POSTing the raw image bytes to a
//! configured vision endpoint (for example Azure AI Vision
//! `imageanalysis:analyze?features=caption`) with a subscription-key header.

mod config;
mod upstream;

pub use config::{UpstreamConfig, SUBSCRIPTION_KEY_HEADER};
pub use upstream::UpstreamBackend;
