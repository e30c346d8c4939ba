//! Web layer for the meeting-point planner.
//!
//! JSON endpoints for planning meeting zones, optimizing the shared budget
//! and sharing scenarios.

mod dto;
mod error;
mod routes;
mod state;

pub use dto::*;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
