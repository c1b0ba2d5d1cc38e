//! Appointment persistence.
//!
//! The core depends on persistence only through the [`AppointmentRepository`]
//! trait. The provided implementation, [`FileAppointmentStore`], keeps one
//! JSON file per appointment in a sharded directory structure:
//!
//! ```text
//! appointments/
//!   <s1>/
//!     <s2>/
//!       <uuid>/
//!         appointment.json
//! ```
//!
//! where `s1`/`s2` are the first four hex characters of the UUID's canonical
//! 32-character form, preventing large fan-out in a single directory.
//!
//! ## Uniqueness and atomicity
//!
//! The store is the single authority for the no-double-booking invariant:
//! an in-memory index maps each active `(date, time, type)` tuple to the
//! appointment holding it. [`AppointmentRepository::insert_pending`] checks
//! and claims the tuple under the store's write lock, so of two concurrent
//! bookings for the same tuple exactly one inserts and the other observes
//! `SlotTaken`. Status transitions run read-validate-write under the same
//! lock, and a transition out of the blocking set releases the tuple in that
//! critical section; there is no separate cleanup step.

use crate::appointment::{Appointment, AppointmentStatus, AppointmentType, ContactInfo};
use crate::config::CoreConfig;
use crate::constants::APPOINTMENT_FILE_NAME;
use crate::dashboard::{AppointmentFilter, DashboardQuery};
use crate::error::{SchedulingError, SchedulingResult, StoreError};
use crate::state_machine::BookingStateMachine;
use chrono::{NaiveDate, NaiveTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Fields required to create a new appointment.
///
/// The status is not part of the request: every insert produces a `pending`
/// appointment.
#[derive(Clone, Debug)]
pub struct NewAppointment {
    pub contact: ContactInfo,
    pub appointment_type: AppointmentType,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub subject: Option<String>,
    pub notes: Option<String>,
}

/// Query/command interface the core uses to reach appointment storage.
pub trait AppointmentRepository: Send + Sync {
    /// All appointments occupying slots for `(date, appointment_type)`, i.e.
    /// those with a blocking status, ordered by time.
    fn find_blocking(
        &self,
        date: NaiveDate,
        appointment_type: AppointmentType,
    ) -> SchedulingResult<Vec<Appointment>>;

    /// Atomically claims the `(date, time, type)` tuple and persists a new
    /// `pending` appointment.
    ///
    /// # Errors
    ///
    /// `SchedulingError::SlotTaken` when an appointment with a blocking
    /// status already holds the tuple; `RepositoryUnavailable` on storage
    /// failure.
    fn insert_pending(&self, request: NewAppointment) -> SchedulingResult<Appointment>;

    /// Applies a status transition with read-validate-write atomicity.
    ///
    /// # Errors
    ///
    /// `SchedulingError::NotFound` for an unknown id,
    /// `SchedulingError::InvalidTransition` when the lifecycle table forbids
    /// the change, `RepositoryUnavailable` on storage failure.
    fn update_status(
        &self,
        id: Uuid,
        new_status: AppointmentStatus,
    ) -> SchedulingResult<Appointment>;

    /// Appointments matching `filter`, ordered by `(date, time)`.
    fn list_all(&self, filter: &AppointmentFilter) -> SchedulingResult<Vec<Appointment>>;

    /// Single appointment lookup.
    fn find_by_id(&self, id: Uuid) -> SchedulingResult<Option<Appointment>>;
}

/// Derives the sharded directory for a record id: `base/<s1>/<s2>/<uuid>/`.
///
/// Uses the canonical 32-character lowercase hex form so path derivation is
/// deterministic across the codebase.
fn sharded_dir(base: &Path, id: Uuid) -> PathBuf {
    let canonical = id.simple().to_string();
    base.join(&canonical[0..2])
        .join(&canonical[2..4])
        .join(canonical)
}

#[derive(Default)]
struct StoreIndex {
    by_id: HashMap<Uuid, Appointment>,
    // One entry per appointment whose status is blocking.
    active: HashMap<(NaiveDate, NaiveTime, AppointmentType), Uuid>,
}

/// File-backed appointment store with an in-memory index.
///
/// The full record set is loaded at open time; every mutation writes the
/// record file before touching the index, so a crash leaves at worst an
/// appointment that the next open will pick up from disk.
pub struct FileAppointmentStore {
    cfg: Arc<CoreConfig>,
    inner: RwLock<StoreIndex>,
}

impl FileAppointmentStore {
    /// Opens the store, creating the appointments directory if needed and
    /// scanning any existing records into the index.
    ///
    /// Record files that cannot be parsed are logged as warnings and
    /// skipped, so one corrupt file does not take the store down.
    pub fn open(cfg: Arc<CoreConfig>) -> SchedulingResult<Self> {
        let appointments_dir = cfg.appointments_dir();
        fs::create_dir_all(&appointments_dir).map_err(StoreError::DirCreation)?;

        let mut index = StoreIndex::default();
        for appointment in scan_records(&appointments_dir) {
            if appointment.status.is_blocking() {
                index.active.insert(appointment.slot_key(), appointment.id);
            }
            index.by_id.insert(appointment.id, appointment);
        }

        Ok(Self {
            cfg,
            inner: RwLock::new(index),
        })
    }

    fn record_path(&self, id: Uuid) -> PathBuf {
        sharded_dir(&self.cfg.appointments_dir(), id).join(APPOINTMENT_FILE_NAME)
    }

    /// Writes `appointment` to its sharded record file.
    fn persist(&self, appointment: &Appointment) -> Result<(), StoreError> {
        let record_dir = sharded_dir(&self.cfg.appointments_dir(), appointment.id);
        fs::create_dir_all(&record_dir).map_err(StoreError::DirCreation)?;

        let json =
            serde_json::to_string_pretty(appointment).map_err(StoreError::Serialization)?;
        fs::write(record_dir.join(APPOINTMENT_FILE_NAME), json).map_err(StoreError::FileWrite)
    }

    fn lock_poisoned() -> SchedulingError {
        // A poisoned lock means a writer panicked mid-mutation; treat the
        // store as unavailable rather than serving possibly-torn state.
        SchedulingError::RepositoryUnavailable(StoreError::FileRead(std::io::Error::other(
            "appointment index lock poisoned",
        )))
    }
}

impl AppointmentRepository for FileAppointmentStore {
    fn find_blocking(
        &self,
        date: NaiveDate,
        appointment_type: AppointmentType,
    ) -> SchedulingResult<Vec<Appointment>> {
        let index = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        let mut blocking: Vec<Appointment> = index
            .by_id
            .values()
            .filter(|a| {
                a.date == date && a.appointment_type == appointment_type && a.status.is_blocking()
            })
            .cloned()
            .collect();
        blocking.sort_by_key(|a| a.time);
        Ok(blocking)
    }

    fn insert_pending(&self, request: NewAppointment) -> SchedulingResult<Appointment> {
        let mut index = self.inner.write().map_err(|_| Self::lock_poisoned())?;

        let key = (request.date, request.time, request.appointment_type);
        if index.active.contains_key(&key) {
            return Err(SchedulingError::SlotTaken {
                date: request.date,
                time: request.time,
                appointment_type: request.appointment_type,
            });
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            contact: request.contact,
            appointment_type: request.appointment_type,
            date: request.date,
            time: request.time,
            subject: request.subject,
            notes: request.notes,
            status: AppointmentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.persist(&appointment) {
            // Roll back the partially created record directory so a failed
            // insert leaves no trace for the next open to misread.
            let record_dir = sharded_dir(&self.cfg.appointments_dir(), appointment.id);
            if let Err(cleanup) = fs::remove_dir_all(&record_dir) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        "failed to clean up record dir {}: {}",
                        record_dir.display(),
                        cleanup
                    );
                }
            }
            return Err(e.into());
        }

        index.active.insert(key, appointment.id);
        index.by_id.insert(appointment.id, appointment.clone());
        tracing::info!(
            "booked {} on {} at {} ({})",
            appointment.appointment_type,
            appointment.date,
            appointment.time,
            appointment.id
        );
        Ok(appointment)
    }

    fn update_status(
        &self,
        id: Uuid,
        new_status: AppointmentStatus,
    ) -> SchedulingResult<Appointment> {
        let mut index = self.inner.write().map_err(|_| Self::lock_poisoned())?;

        let current = index
            .by_id
            .get(&id)
            .ok_or(SchedulingError::NotFound(id))?;
        BookingStateMachine::validate_transition(current.status, new_status)?;

        let mut updated = current.clone();
        let was_blocking = updated.status.is_blocking();
        updated.status = new_status;
        updated.updated_at = Utc::now();

        self.persist(&updated)?;

        if was_blocking && !new_status.is_blocking() {
            index.active.remove(&updated.slot_key());
        }
        index.by_id.insert(id, updated.clone());
        tracing::info!("appointment {} is now {}", id, new_status);
        Ok(updated)
    }

    fn list_all(&self, filter: &AppointmentFilter) -> SchedulingResult<Vec<Appointment>> {
        let index = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        let mut appointments: Vec<Appointment> = index.by_id.values().cloned().collect();
        appointments.sort_by_key(|a| (a.date, a.time, a.created_at));
        Ok(DashboardQuery::filter(appointments, filter))
    }

    fn find_by_id(&self, id: Uuid) -> SchedulingResult<Option<Appointment>> {
        let index = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(index.by_id.get(&id).cloned())
    }
}

/// Reads every appointment record under the sharded directory structure.
///
/// Unparseable files are logged as warnings and skipped.
fn scan_records(appointments_dir: &Path) -> Vec<Appointment> {
    let mut appointments = Vec::new();

    let s1_iter = match fs::read_dir(appointments_dir) {
        Ok(it) => it,
        Err(_) => return appointments,
    };
    for s1 in s1_iter.flatten() {
        let s1_path = s1.path();
        if !s1_path.is_dir() {
            continue;
        }

        let s2_iter = match fs::read_dir(&s1_path) {
            Ok(it) => it,
            Err(_) => continue,
        };

        for s2 in s2_iter.flatten() {
            let s2_path = s2.path();
            if !s2_path.is_dir() {
                continue;
            }

            let id_iter = match fs::read_dir(&s2_path) {
                Ok(it) => it,
                Err(_) => continue,
            };

            for id_ent in id_iter.flatten() {
                let id_path = id_ent.path();
                if !id_path.is_dir() {
                    continue;
                }

                let record_path = id_path.join(APPOINTMENT_FILE_NAME);
                if !record_path.is_file() {
                    continue;
                }

                match fs::read_to_string(&record_path) {
                    Ok(contents) => match serde_json::from_str::<Appointment>(&contents) {
                        Ok(appointment) => appointments.push(appointment),
                        Err(e) => {
                            tracing::warn!(
                                "failed to parse appointment record: {} - {}",
                                record_path.display(),
                                e
                            );
                        }
                    },
                    Err(e) => {
                        tracing::warn!(
                            "failed to read appointment record: {} - {}",
                            record_path.display(),
                            e
                        );
                    }
                }
            }
        }
    }

    appointments
}
