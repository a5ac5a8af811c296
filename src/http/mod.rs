//! # HTTP Server Module
//!
//! REST API surface for the availability engine, built with Axum.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                HTTP Layer                    │
//! │  ┌─────────┐  ┌──────────┐  ┌────────────┐   │
//! │  │ Router  │─▶│ Handlers │─▶│    DTOs    │   │
//! │  └─────────┘  └──────────┘  └────────────┘   │
//! └─────────────────────┬────────────────────────┘
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │              Service Layer                   │
//! │     get_slots()        BookingCommitter      │
//! └─────────────────────┬────────────────────────┘
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │     Repository + CalendarProvider            │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Endpoints
//!
//! - `GET /health` - service and store health
//! - `GET /v1/event-types/{event_type_id}/slots` - offerable slots
//! - `POST /v1/bookings` - commit a booking against an offered slot

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
