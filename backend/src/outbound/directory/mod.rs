//! User directory outbound adapters.
//!
//! Provides the reqwest implementation of the `UserDirectory` port.

mod dto;
mod http_directory;

pub use http_directory::HttpUserDirectory;
