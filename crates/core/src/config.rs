//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process
//! startup and then passed into core services. The intent is to avoid reading
//! process-wide environment variables during request handling, which can lead
//! to inconsistent behaviour in multi-threaded runtimes and test harnesses.

use crate::appointment::AppointmentType;
use crate::constants::{
    DEFAULT_BOOKING_WINDOW_MONTHS, DEFAULT_CLOSING_HOUR, DEFAULT_FORMATION_SLOT_MINUTES,
    DEFAULT_LIVRABLES_SLOT_MINUTES, DEFAULT_OPENING_HOUR,
};
use crate::error::{SchedulingError, SchedulingResult};
use chrono::NaiveTime;
use std::path::{Path, PathBuf};

/// Daily opening hours within which every slot must fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusinessHours {
    open: NaiveTime,
    close: NaiveTime,
}

impl BusinessHours {
    /// Creates business hours, rejecting an empty or inverted day.
    pub fn new(open: NaiveTime, close: NaiveTime) -> SchedulingResult<Self> {
        if open >= close {
            return Err(SchedulingError::InvalidConfig(format!(
                "business hours must open before they close (got {open}..{close})"
            )));
        }
        Ok(Self { open, close })
    }

    pub fn open(&self) -> NaiveTime {
        self.open
    }

    pub fn close(&self) -> NaiveTime {
        self.close
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        // 09:00-16:00; constants guarantee validity.
        Self {
            open: NaiveTime::from_hms_opt(DEFAULT_OPENING_HOUR, 0, 0)
                .unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(DEFAULT_CLOSING_HOUR, 0, 0)
                .unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    business_hours: BusinessHours,
    booking_window_months: u32,
    formation_slot_minutes: u32,
    livrables_slot_minutes: u32,
}

impl CoreConfig {
    /// Creates a configuration with the default scheduling rules.
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            business_hours: BusinessHours::default(),
            booking_window_months: DEFAULT_BOOKING_WINDOW_MONTHS,
            formation_slot_minutes: DEFAULT_FORMATION_SLOT_MINUTES,
            livrables_slot_minutes: DEFAULT_LIVRABLES_SLOT_MINUTES,
        }
    }

    /// Creates a configuration with explicit scheduling rules.
    ///
    /// # Errors
    ///
    /// Returns `SchedulingError::InvalidConfig` if the booking window is zero,
    /// a slot length is zero, or a slot length does not fit at least once
    /// within the business hours.
    pub fn with_rules(
        data_dir: PathBuf,
        business_hours: BusinessHours,
        booking_window_months: u32,
        formation_slot_minutes: u32,
        livrables_slot_minutes: u32,
    ) -> SchedulingResult<Self> {
        if booking_window_months == 0 {
            return Err(SchedulingError::InvalidConfig(
                "booking window must cover at least one month".into(),
            ));
        }

        let day_minutes = (business_hours.close() - business_hours.open()).num_minutes();
        for (name, minutes) in [
            ("formation", formation_slot_minutes),
            ("livrables", livrables_slot_minutes),
        ] {
            if minutes == 0 {
                return Err(SchedulingError::InvalidConfig(format!(
                    "{name} slot length must be positive"
                )));
            }
            if i64::from(minutes) > day_minutes {
                return Err(SchedulingError::InvalidConfig(format!(
                    "{name} slot length of {minutes} minutes does not fit within business hours"
                )));
            }
        }

        Ok(Self {
            data_dir,
            business_hours,
            booking_window_months,
            formation_slot_minutes,
            livrables_slot_minutes,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding appointment records.
    pub fn appointments_dir(&self) -> PathBuf {
        self.data_dir.join(crate::constants::APPOINTMENTS_DIR_NAME)
    }

    /// Directory holding contact messages.
    pub fn messages_dir(&self) -> PathBuf {
        self.data_dir.join(crate::constants::MESSAGES_DIR_NAME)
    }

    pub fn business_hours(&self) -> BusinessHours {
        self.business_hours
    }

    pub fn booking_window_months(&self) -> u32 {
        self.booking_window_months
    }

    /// Slot length in minutes for the given appointment type.
    pub fn slot_minutes(&self, appointment_type: AppointmentType) -> u32 {
        match appointment_type {
            AppointmentType::Formation => self.formation_slot_minutes,
            AppointmentType::Livrables => self.livrables_slot_minutes,
        }
    }
}
