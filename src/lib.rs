//! # TimeTide Engine
//!
//! Availability resolution and slot generation for a scheduling service.
//!
//! The engine turns a host's weekly availability pattern, date overrides,
//! existing bookings and connected-calendar busy intervals into the list of
//! slots an invitee can actually book, and commits bookings against those
//! slots without double-booking under concurrency.
//!
//! ## Modules
//!
//! - [`models`] - domain types: time windows, schedules, event types, bookings
//! - [`services`] - recurrence expansion, busy aggregation, slot generation,
//!   availability queries and the booking committer
//! - [`calendar`] - external busy-interval sources
//! - [`db`] - repository traits and the in-memory store
//! - [`config`] - engine caps, calendar timeout and degradation policy
//! - [`http`] - REST API (requires the `http-server` feature)
//!
//! ## Quick start
//!
//! ```no_run
//! use timetide_engine::db::{self, SchedulingRepository};
//!
//! #[tokio::main]
//! async fn main() {
//!     db::init_repository().expect("repository init");
//!     let repo = db::get_repository().expect("repository");
//!     let healthy = repo.health_check().await.unwrap();
//!     assert!(healthy);
//! }
//! ```

pub mod api;
pub mod calendar;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
