//! Wire types for the RDV HTTP API.
//!
//! These are the exact request and response bodies serialized on the wire.
//! Inbound command bodies use `#[serde(deny_unknown_fields)]` so typos fail
//! loudly instead of silently dropping data. Domain conversion happens in the
//! API layer; nothing here depends on core types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Standard JSON error body: `{"error": "<message>"}`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    /// Human-readable message safe to show to the caller.
    pub error: String,
}

/// One bookable slot.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SlotRes {
    /// Canonical `HH:MM` value to submit when booking.
    pub time: String,
    /// Display label for the slot.
    pub display: String,
}

/// Response of the slot query endpoint.
///
/// An empty `available_slots` array is a valid success response meaning "no
/// availability".
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailableSlotsRes {
    pub available_slots: Vec<SlotRes>,
}

/// Booking form submission.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAppointmentReq {
    /// ISO-8601 calendar date, e.g. `2024-06-11`.
    pub appointment_date: String,
    /// Zero-padded 24-hour `HH:MM` slot time.
    pub appointment_time: String,
    /// Appointment type: `formation` or `livrables`.
    #[serde(rename = "type")]
    pub appointment_type: String,
    /// Full name of the person booking.
    pub name: String,
    /// Contact email address.
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A single appointment as returned to callers.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentRes {
    pub id: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Response of the dashboard listing endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListAppointmentsRes {
    pub appointments: Vec<AppointmentRes>,
}

/// Staff status-change submission.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusReq {
    /// Requested status: `confirmed`, `cancelled` or `completed`.
    pub new_status: String,
}

/// Contact form submission.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ContactMessageReq {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

/// Response after storing a contact message.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactMessageRes {
    pub id: String,
    pub sent_at: String,
}
