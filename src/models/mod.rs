pub mod clock_event;
pub mod counter;
pub mod employee;
pub mod event_kind;
pub mod geofence;
pub mod justification;
pub mod message_key;
