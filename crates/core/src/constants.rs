//! Shared constants for the scheduling core.

/// Default directory for appointment and contact-message storage.
pub const DEFAULT_DATA_DIR: &str = "/rdv_data";

/// Subdirectory of the data directory holding appointment records.
pub const APPOINTMENTS_DIR_NAME: &str = "appointments";

/// Subdirectory of the data directory holding contact messages.
pub const MESSAGES_DIR_NAME: &str = "messages";

/// File name of a stored appointment record inside its sharded directory.
pub const APPOINTMENT_FILE_NAME: &str = "appointment.json";

/// File name of a stored contact message inside its sharded directory.
pub const MESSAGE_FILE_NAME: &str = "message.json";

/// How far ahead bookings may be placed, in calendar months.
pub const DEFAULT_BOOKING_WINDOW_MONTHS: u32 = 3;

/// Opening hour of the bookable day (first slot may start here).
pub const DEFAULT_OPENING_HOUR: u32 = 9;

/// Closing hour of the bookable day (every slot must end by here).
pub const DEFAULT_CLOSING_HOUR: u32 = 16;

/// Slot length for `formation` appointments, in minutes.
pub const DEFAULT_FORMATION_SLOT_MINUTES: u32 = 60;

/// Slot length for `livrables` appointments, in minutes.
pub const DEFAULT_LIVRABLES_SLOT_MINUTES: u32 = 120;
