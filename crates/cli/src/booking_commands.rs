use {
    anyhow::Result,
    clap::Subcommand,
    sayvai_bookings::{AppointmentAction, CustomerDetails, NewAppointment},
    sayvai_config::SayvaiConfig,
    sayvai_tools::booking::{parse_date, parse_date_time},
    serde_json::Value,
};

use crate::build_client;

#[derive(Subcommand)]
pub enum BookingAction {
    /// Free slots on a day (YYYY-MM-DD).
    Availability {
        #[arg(long)]
        date: String,
    },
    /// Show one appointment.
    Get {
        #[arg(long)]
        booking_id: String,
    },
    /// Book a new appointment.
    Book {
        /// Start time, YYYY-MM-DD HH:MM.
        #[arg(long)]
        from: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        time_zone: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Cancel an appointment or mark it completed / no-show.
    Update {
        #[arg(long)]
        booking_id: String,
        /// cancel, completed or noshow.
        #[arg(long)]
        action: AppointmentAction,
    },
    /// Move an appointment to a new start time.
    Reschedule {
        #[arg(long)]
        booking_id: String,
        /// New start time, YYYY-MM-DD HH:MM.
        #[arg(long)]
        start: String,
        #[arg(long)]
        staff_id: Option<String>,
    },
}

pub async fn handle_bookings(action: BookingAction, config: &SayvaiConfig) -> Result<()> {
    let client = build_client(config)?;

    let body = match action {
        BookingAction::Availability { date } => client.availability(parse_date(&date)?).await?,
        BookingAction::Get { booking_id } => client.get_appointment(&booking_id).await?,
        BookingAction::Book {
            from,
            name,
            email,
            phone,
            time_zone,
            notes,
        } => {
            let mut appointment = NewAppointment::new(parse_date_time(&from)?, CustomerDetails {
                name,
                email,
                phone_number: phone,
            });
            appointment.time_zone = time_zone;
            appointment.notes = notes;
            client.book(&appointment).await?
        },
        BookingAction::Update { booking_id, action } => {
            client.update_appointment(&booking_id, action).await?
        },
        BookingAction::Reschedule {
            booking_id,
            start,
            staff_id,
        } => {
            client
                .reschedule(&booking_id, parse_date_time(&start)?, staff_id.as_deref())
                .await?
        },
    };

    print_json(&body)
}

fn print_json(body: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(())
}
