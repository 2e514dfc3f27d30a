//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit around every handler, namely
//! trace correlation and new-session persistence.

pub mod session_tracking;
pub mod trace;

pub use session_tracking::SessionTracking;
pub use trace::Trace;
