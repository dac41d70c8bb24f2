//! Command implementations for caption-cli

pub mod caption;
pub mod raw;

pub use caption::caption;
pub use raw::raw;
