use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use rdv_core::{
    AppointmentFilter, AppointmentStatus, AppointmentType, BookingRequest, ContactInfo,
    ContactMessageStore, CoreConfig, EmailAddress, FileAppointmentStore, NonEmptyText,
    SchedulingService,
};

#[derive(Parser)]
#[command(name = "rdv")]
#[command(about = "RDV appointment booking system CLI")]
struct Cli {
    /// Data directory (defaults to $RDV_DATA_DIR, then /rdv_data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available slots for a date and type
    Slots {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Appointment type (formation or livrables)
        r#type: String,
    },
    /// Book an appointment
    Book {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Slot time (HH:MM)
        time: String,
        /// Appointment type (formation or livrables)
        r#type: String,
        /// Full name of the client
        name: String,
        /// Contact email
        email: String,
        /// Phone number (optional)
        #[arg(long)]
        phone: Option<String>,
        /// Subject (optional)
        #[arg(long)]
        subject: Option<String>,
        /// Notes (optional)
        #[arg(long)]
        notes: Option<String>,
    },
    /// List appointments
    List {
        /// Filter by appointment type
        #[arg(long)]
        r#type: Option<String>,
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
    },
    /// Change an appointment's status
    SetStatus {
        /// Appointment UUID
        id: String,
        /// New status (confirmed, cancelled or completed)
        status: String,
    },
    /// List contact messages, newest first
    Messages,
}

fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var("RDV_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(rdv_core::constants::DEFAULT_DATA_DIR))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cfg = Arc::new(CoreConfig::new(resolve_data_dir(cli.data_dir)));

    match cli.command {
        Some(Commands::Slots { date, r#type }) => {
            let date: NaiveDate = date.parse()?;
            let appointment_type: AppointmentType = r#type.parse()?;
            let service = open_service(cfg)?;

            match service.available_slots(date, appointment_type) {
                Ok(slots) if slots.is_empty() => {
                    println!("No slots available on {date} for {appointment_type}.");
                }
                Ok(slots) => {
                    for slot in slots {
                        println!("{}", slot.display);
                    }
                }
                Err(e) => eprintln!("Error listing slots: {e}"),
            }
        }
        Some(Commands::Book {
            date,
            time,
            r#type,
            name,
            email,
            phone,
            subject,
            notes,
        }) => {
            let request = BookingRequest {
                appointment_type: r#type.parse()?,
                date: date.parse()?,
                time: NaiveTime::parse_from_str(&time, "%H:%M")?,
                contact: ContactInfo {
                    name: NonEmptyText::new(&name)?,
                    email: EmailAddress::parse(&email)?,
                    phone,
                },
                subject,
                notes,
            };
            let service = open_service(cfg)?;

            match service.create_booking(request) {
                Ok(appointment) => println!(
                    "Booked {} on {} at {} (id: {})",
                    appointment.appointment_type,
                    appointment.date,
                    rdv_core::slots::format_slot_time(appointment.time),
                    appointment.id
                ),
                Err(e) => eprintln!("Error booking appointment: {e}"),
            }
        }
        Some(Commands::List { r#type, status }) => {
            let filter = AppointmentFilter {
                appointment_type: r#type.map(|t| t.parse::<AppointmentType>()).transpose()?,
                status: status.map(|s| s.parse::<AppointmentStatus>()).transpose()?,
            };
            let service = open_service(cfg)?;

            match service.list_appointments(&filter) {
                Ok(appointments) if appointments.is_empty() => {
                    println!("No appointments found.");
                }
                Ok(appointments) => {
                    for a in appointments {
                        println!(
                            "{} | {} {} | {} | {} | {} <{}>",
                            a.id,
                            a.date,
                            rdv_core::slots::format_slot_time(a.time),
                            a.appointment_type,
                            a.status,
                            a.contact.name,
                            a.contact.email
                        );
                    }
                }
                Err(e) => eprintln!("Error listing appointments: {e}"),
            }
        }
        Some(Commands::SetStatus { id, status }) => {
            let id = Uuid::parse_str(&id)?;
            let new_status: AppointmentStatus = status.parse()?;
            let service = open_service(cfg)?;

            match service.update_status(id, new_status) {
                Ok(appointment) => {
                    println!("Appointment {} is now {}", appointment.id, appointment.status);
                }
                Err(e) => eprintln!("Error updating status: {e}"),
            }
        }
        Some(Commands::Messages) => {
            let store = ContactMessageStore::open(cfg)?;
            match store.list() {
                Ok(messages) if messages.is_empty() => println!("No contact messages."),
                Ok(messages) => {
                    for m in messages {
                        println!(
                            "{} | {} <{}> | {}",
                            m.sent_at.to_rfc3339(),
                            m.name,
                            m.email,
                            m.subject.as_deref().unwrap_or("-")
                        );
                    }
                }
                Err(e) => eprintln!("Error listing messages: {e}"),
            }
        }
        None => {
            println!("Use 'rdv --help' for commands");
        }
    }

    Ok(())
}

fn open_service(cfg: Arc<CoreConfig>) -> Result<SchedulingService, Box<dyn std::error::Error>> {
    let store = Arc::new(FileAppointmentStore::open(cfg.clone())?);
    Ok(SchedulingService::new(cfg, store))
}
