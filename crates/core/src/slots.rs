//! Slot grids and availability computation.
//!
//! Each appointment type books into a fixed grid of start times: beginning at
//! the opening hour and stepping by the type's slot length for as long as a
//! full slot still ends by closing time. With the default rules
//! (09:00-16:00) that gives `formation` seven one-hour slots (09:00..15:00)
//! and `livrables` three two-hour slots (09:00, 11:00, 13:00).
//!
//! Availability is always recomputed from current appointment state; slots
//! are never persisted, so there is nothing to go stale.

use crate::appointment::AppointmentType;
use crate::calendar::CalendarWindow;
use crate::config::CoreConfig;
use crate::error::{SchedulingError, SchedulingResult};
use crate::repository::AppointmentRepository;
use chrono::{Duration, NaiveDate, NaiveTime};
use std::sync::Arc;

/// A bookable time slot, computed per request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    /// Canonical start time, used when submitting a booking.
    pub time: NaiveTime,
    /// Caller-facing label, zero-padded 24-hour `HH:MM`.
    pub display: String,
}

impl Slot {
    fn at(time: NaiveTime) -> Self {
        Self {
            display: format_slot_time(time),
            time,
        }
    }
}

/// Renders a slot time as zero-padded 24-hour `HH:MM`.
pub fn format_slot_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Enumerates the full slot grid for `appointment_type`, in chronological
/// order.
///
/// The grid is a pure function of the configured business hours and the
/// type's slot length; it does not depend on any booking state.
pub fn slot_grid(cfg: &CoreConfig, appointment_type: AppointmentType) -> Vec<NaiveTime> {
    let hours = cfg.business_hours();
    let step = Duration::minutes(i64::from(cfg.slot_minutes(appointment_type)));

    let mut grid = Vec::new();
    let mut start = hours.open();
    // NaiveTime arithmetic wraps at midnight; overflowing_add_signed reports
    // the wrap so the loop can stop at the end of the day.
    loop {
        let (end, wrapped) = start.overflowing_add_signed(step);
        if wrapped != 0 || end > hours.close() {
            break;
        }
        grid.push(start);
        start = end;
    }
    grid
}

/// Computes bookable slots for a `(date, type)` pair.
///
/// Pure read path: unlimited concurrent queries are safe, and two queries
/// without an intervening write return identical results.
#[derive(Clone)]
pub struct AvailabilityEngine {
    cfg: Arc<CoreConfig>,
}

impl AvailabilityEngine {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Returns the ordered free slots for `date` and `appointment_type`.
    ///
    /// # Errors
    ///
    /// Returns `SchedulingError::InvalidDate` when `window` rejects the date;
    /// callers must not compute slots for an illegal date. Store failures
    /// surface as `RepositoryUnavailable`.
    ///
    /// An empty vector is a normal outcome meaning "no availability", not an
    /// error.
    pub fn available_slots(
        &self,
        repository: &dyn AppointmentRepository,
        window: &CalendarWindow,
        date: NaiveDate,
        appointment_type: AppointmentType,
    ) -> SchedulingResult<Vec<Slot>> {
        if let Some(rejection) = window.rejection(date) {
            return Err(SchedulingError::InvalidDate(rejection));
        }

        let blocking = repository.find_blocking(date, appointment_type)?;
        let taken: Vec<NaiveTime> = blocking.iter().map(|a| a.time).collect();

        Ok(slot_grid(&self.cfg, appointment_type)
            .into_iter()
            .filter(|time| !taken.contains(time))
            .map(Slot::at)
            .collect())
    }

    /// Whether `time` is on the grid for `appointment_type` at all,
    /// regardless of bookings.
    pub fn is_grid_time(&self, appointment_type: AppointmentType, time: NaiveTime) -> bool {
        slot_grid(&self.cfg, appointment_type).contains(&time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_cfg() -> CoreConfig {
        CoreConfig::new(PathBuf::from("/tmp/rdv"))
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("valid test time")
    }

    #[test]
    fn test_formation_grid_is_hourly() {
        let grid = slot_grid(&test_cfg(), AppointmentType::Formation);
        let expected: Vec<NaiveTime> = (9..=15).map(|h| time(h, 0)).collect();
        assert_eq!(grid, expected);
    }

    #[test]
    fn test_livrables_grid_steps_by_two_hours() {
        let grid = slot_grid(&test_cfg(), AppointmentType::Livrables);
        assert_eq!(grid, vec![time(9, 0), time(11, 0), time(13, 0)]);
    }

    #[test]
    fn test_grid_is_chronological() {
        for appointment_type in AppointmentType::ALL {
            let grid = slot_grid(&test_cfg(), appointment_type);
            let mut sorted = grid.clone();
            sorted.sort();
            assert_eq!(grid, sorted);
        }
    }

    #[test]
    fn test_display_label_is_zero_padded() {
        assert_eq!(format_slot_time(time(9, 0)), "09:00");
        assert_eq!(format_slot_time(time(13, 30)), "13:30");
    }
}
