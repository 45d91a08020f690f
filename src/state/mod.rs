//! State module for tracking collection progress
//!
//! # Components
//!
//! - `WalkState`: where the message page walker is in its fetch/process cycle

mod walk_state;

// Re-export main types
pub use walk_state::WalkState;
