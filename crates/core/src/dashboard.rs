//! Staff dashboard filtering.
//!
//! Thin by design, but it shares the status/type vocabulary with the state
//! machine, so it lives in the core rather than the API layer. Filtering is
//! pure: no persistence side effects, stable input order.

use crate::appointment::{Appointment, AppointmentStatus, AppointmentType};

/// Criteria for narrowing an appointment listing.
///
/// Omitted criteria match everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub appointment_type: Option<AppointmentType>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentFilter {
    /// Matches every appointment.
    pub fn any() -> Self {
        Self::default()
    }

    /// Whether `appointment` satisfies all provided criteria.
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.appointment_type
            .map_or(true, |t| appointment.appointment_type == t)
            && self.status.map_or(true, |s| appointment.status == s)
    }
}

/// Appointment list filtering for staff views.
///
/// This is a zero-sized type used for namespacing; all methods are associated
/// functions.
pub struct DashboardQuery;

impl DashboardQuery {
    /// Returns the appointments matching `filter`, preserving input order.
    ///
    /// The repository hands lists over already sorted by `(date, time)`, and
    /// this function keeps that order.
    pub fn filter(appointments: Vec<Appointment>, filter: &AppointmentFilter) -> Vec<Appointment> {
        appointments
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::ContactInfo;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use rdv_types::{EmailAddress, NonEmptyText};
    use uuid::Uuid;

    fn appointment(
        appointment_type: AppointmentType,
        status: AppointmentStatus,
        day: u32,
    ) -> Appointment {
        let now = Utc::now();
        Appointment {
            id: Uuid::new_v4(),
            contact: ContactInfo {
                name: NonEmptyText::new("Test Client").unwrap(),
                email: EmailAddress::parse("client@example.com").unwrap(),
                phone: None,
            },
            appointment_type,
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            subject: None,
            notes: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let appointments = vec![
            appointment(AppointmentType::Formation, AppointmentStatus::Pending, 10),
            appointment(AppointmentType::Livrables, AppointmentStatus::Cancelled, 11),
        ];
        let result = DashboardQuery::filter(appointments.clone(), &AppointmentFilter::any());
        assert_eq!(result, appointments);
    }

    #[test]
    fn test_filters_by_type() {
        let formation =
            appointment(AppointmentType::Formation, AppointmentStatus::Pending, 10);
        let livrables =
            appointment(AppointmentType::Livrables, AppointmentStatus::Pending, 11);
        let filter = AppointmentFilter {
            appointment_type: Some(AppointmentType::Livrables),
            status: None,
        };
        let result = DashboardQuery::filter(vec![formation, livrables.clone()], &filter);
        assert_eq!(result, vec![livrables]);
    }

    #[test]
    fn test_filters_by_status_and_type_together() {
        let keep = appointment(AppointmentType::Formation, AppointmentStatus::Confirmed, 10);
        let wrong_status =
            appointment(AppointmentType::Formation, AppointmentStatus::Pending, 11);
        let wrong_type =
            appointment(AppointmentType::Livrables, AppointmentStatus::Confirmed, 12);
        let filter = AppointmentFilter {
            appointment_type: Some(AppointmentType::Formation),
            status: Some(AppointmentStatus::Confirmed),
        };
        let result = DashboardQuery::filter(vec![keep.clone(), wrong_status, wrong_type], &filter);
        assert_eq!(result, vec![keep]);
    }

    #[test]
    fn test_preserves_input_order() {
        let first = appointment(AppointmentType::Formation, AppointmentStatus::Pending, 10);
        let second = appointment(AppointmentType::Formation, AppointmentStatus::Pending, 11);
        let third = appointment(AppointmentType::Formation, AppointmentStatus::Pending, 12);
        let result = DashboardQuery::filter(
            vec![first.clone(), second.clone(), third.clone()],
            &AppointmentFilter::any(),
        );
        assert_eq!(result, vec![first, second, third]);
    }
}
