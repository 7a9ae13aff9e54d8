//! Server core functionality
//!
//! This module contains the HTTP server, its router and the state shared
//! between request handlers.

pub mod core;
pub mod router;
pub mod state;

pub use self::core::Server;
pub use router::build_router;
pub use state::AppState;
