//! Domain layer: webhook payloads, date derivation, attendance rows and the
//! processed-event cache.
//!
//! Nothing here performs I/O; the service layer wires these types to the
//! chat platform client and the stores.

pub mod arrival_date;
pub mod attendance;
pub mod inbound_event;
pub mod processed_events;

pub use arrival_date::ArrivalDateRule;
pub use attendance::{ATTENDANCE_HEADER, AttendanceRecord};
pub use inbound_event::{InboundEvent, PayloadType, TargetReaction};
pub use processed_events::{DEFAULT_CAPACITY, PROCESSED_EVENTS_KEY, ProcessedEventCache};
