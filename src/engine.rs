use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use log::{debug, error};
use sqlx::SqlitePool;

use crate::calendar::minutes_from_midnight;
use crate::closures::ClosureRegistry;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, NotAvailableReason};
use crate::hours::WorkingHoursPolicy;
use crate::ledger::{overlaps, BookingLedger};
use crate::models::{Booking, SlotRequest};

/// Receives booking lifecycle events. Implemented by the chat layer and
/// injected, so the engine itself never touches the transport.
#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn booking_confirmed(
        &self,
        booking: &Booking,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn booking_cancelled(
        &self,
        booking: &Booking,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Notifier that drops every event.
pub struct NoopNotifier;

#[async_trait]
impl BookingNotifier for NoopNotifier {
    async fn booking_confirmed(&self, _: &Booking) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    async fn booking_cancelled(&self, _: &Booking) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

/// Composes the working-hours policy, the closure registry and the booking
/// ledger into slot computation and conflict-checked reservation. Holds no
/// booking state of its own; every query goes to the ledger fresh.
pub struct AvailabilityEngine {
    hours: WorkingHoursPolicy,
    closures: ClosureRegistry,
    ledger: BookingLedger,
    weekly_off_day: Weekday,
    granularity_minutes: u32,
    notifier: Arc<dyn BookingNotifier>,
}

impl AvailabilityEngine {
    pub fn new(pool: SqlitePool, config: &EngineConfig) -> Self {
        Self::with_notifier(pool, config, Arc::new(NoopNotifier))
    }

    pub fn with_notifier(
        pool: SqlitePool,
        config: &EngineConfig,
        notifier: Arc<dyn BookingNotifier>,
    ) -> Self {
        AvailabilityEngine {
            hours: WorkingHoursPolicy::new(pool.clone()),
            closures: ClosureRegistry::new(pool.clone()),
            ledger: BookingLedger::new(pool),
            weekly_off_day: config.weekly_off_day,
            granularity_minutes: config.slot_granularity_minutes,
            notifier,
        }
    }

    pub fn hours(&self) -> &WorkingHoursPolicy {
        &self.hours
    }

    pub fn closures(&self) -> &ClosureRegistry {
        &self.closures
    }

    pub fn ledger(&self) -> &BookingLedger {
        &self.ledger
    }

    /// Bookable start times for `date`, using the configured granularity and
    /// the current wall clock.
    pub async fn available_slots(
        &self,
        date: NaiveDate,
        duration_minutes: i64,
    ) -> EngineResult<Vec<NaiveTime>> {
        self.available_slots_with(
            date,
            duration_minutes,
            self.granularity_minutes,
            Local::now().naive_local(),
        )
        .await
    }

    /// Full-parameter slot computation. Deterministic in its inputs plus
    /// `now`: frozen inputs give identical output, which is what lets the
    /// confirmation path re-validate idempotently.
    pub async fn available_slots_with(
        &self,
        date: NaiveDate,
        duration_minutes: i64,
        granularity_minutes: u32,
        now: NaiveDateTime,
    ) -> EngineResult<Vec<NaiveTime>> {
        if duration_minutes <= 0 {
            return Err(EngineError::InvalidDuration(duration_minutes));
        }
        if granularity_minutes == 0 {
            return Err(EngineError::InvalidGranularity);
        }
        if date.weekday() == self.weekly_off_day {
            return Ok(Vec::new());
        }
        if self.closures.is_day_closed(date).await? {
            return Ok(Vec::new());
        }

        let window = self.hours.get().await?;
        let close = minutes_from_midnight(window.close);
        let bookings = self.ledger.list_for_date(date).await?;

        let mut slots = Vec::new();
        let mut m = minutes_from_midnight(window.open);
        while m + duration_minutes <= close {
            if let Some(t) = slot_time(m) {
                let in_past = date == now.date() && t <= now.time();
                if !in_past
                    && !self.closures.is_slot_closed(date, t).await?
                    && !bookings.iter().any(|b| {
                        overlaps(t, duration_minutes, b.start_time, b.duration_minutes)
                    })
                {
                    slots.push(t);
                }
            }
            m += i64::from(granularity_minutes);
        }
        debug!("{} bookable slots on {}", slots.len(), date);
        Ok(slots)
    }

    /// Re-validates the slot against fresh state, then hands the atomic
    /// check-and-commit to the ledger. On `Conflict` the caller must re-run
    /// availability and offer a new choice, not retry the same slot.
    pub async fn reserve_slot(&self, req: &SlotRequest) -> EngineResult<Booking> {
        if req.duration_minutes <= 0 {
            return Err(EngineError::InvalidDuration(req.duration_minutes));
        }
        if req.date.weekday() == self.weekly_off_day {
            return Err(EngineError::NotAvailable {
                reason: NotAvailableReason::WeeklyOffDay,
            });
        }
        if self.closures.is_day_closed(req.date).await? {
            return Err(EngineError::NotAvailable {
                reason: NotAvailableReason::DayClosed,
            });
        }
        if self.closures.is_slot_closed(req.date, req.start_time).await? {
            return Err(EngineError::NotAvailable {
                reason: NotAvailableReason::SlotClosed,
            });
        }

        let booking = self.ledger.reserve(req).await?;

        // the reservation stands even when delivery fails
        if let Err(e) = self.notifier.booking_confirmed(&booking).await {
            error!("failed to deliver booking confirmation: {}", e);
        }
        Ok(booking)
    }

    pub async fn cancel_booking(&self, id: i64) -> EngineResult<Booking> {
        let booking = self.ledger.cancel(id).await?;
        if let Err(e) = self.notifier.booking_cancelled(&booking).await {
            error!("failed to deliver cancellation notice: {}", e);
        }
        Ok(booking)
    }
}

fn slot_time(minutes: i64) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
}
