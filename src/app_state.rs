//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::AttendanceService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Attendance service handling webhook deliveries.
    pub attendance_service: Arc<AttendanceService>,
}
