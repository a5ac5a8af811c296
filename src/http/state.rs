//! Application state for the HTTP server.

use std::sync::Arc;

use crate::calendar::CalendarProvider;
use crate::config::EngineConfig;
use crate::db::FullRepository;
use crate::services::BookingCommitter;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for store operations
    pub repository: Arc<dyn FullRepository>,
    /// Busy-interval source for connected calendars
    pub calendar: Arc<dyn CalendarProvider>,
    /// Engine caps, timeout and degradation policy
    pub config: EngineConfig,
    /// The one serialized writer for bookings
    pub committer: Arc<BookingCommitter>,
}

impl AppState {
    /// Create a new application state with the given collaborators.
    pub fn new(
        repository: Arc<dyn FullRepository>,
        calendar: Arc<dyn CalendarProvider>,
        config: EngineConfig,
    ) -> Self {
        let committer = Arc::new(BookingCommitter::new(
            repository.clone(),
            calendar.clone(),
            config.clone(),
        ));
        Self {
            repository,
            calendar,
            config,
            committer,
        }
    }
}
