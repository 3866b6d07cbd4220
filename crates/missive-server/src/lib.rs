//! REST API server for missive letters.
//!
//! A thin axum layer over `missive_core`: the route table lives in
//! [`http::build_router`], shared state in [`state::AppState`], and the
//! session store in [`session`]. Binaries and integration tests both build
//! the app through these pieces.

pub mod http;
pub mod session;
pub mod state;

pub use http::build_router;
pub use state::AppState;
