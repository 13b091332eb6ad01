//! Wire types shared between the calendar proxy and its browser client.

pub mod api;

pub use api::{CalendarInfo, CalendarResult, ErrorResponse};
