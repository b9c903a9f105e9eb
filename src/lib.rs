//! Slot-availability and booking-conflict engine for an appointment bot.
//!
//! The chat transport, menus and the service catalog live elsewhere; this
//! crate owns working hours, closures and the booking ledger, computes the
//! bookable start times for a date, and guarantees that two overlapping
//! bookings on the same date can never both be confirmed, even under
//! concurrent requests.

pub mod calendar;
pub mod closures;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod hours;
pub mod ledger;
pub mod models;

pub use closures::ClosureRegistry;
pub use config::EngineConfig;
pub use engine::{AvailabilityEngine, BookingNotifier, NoopNotifier};
pub use error::{EngineError, EngineResult, NotAvailableReason};
pub use hours::WorkingHoursPolicy;
pub use ledger::BookingLedger;
pub use models::{Booking, ClosedSlot, SlotRequest, WorkingHours};
