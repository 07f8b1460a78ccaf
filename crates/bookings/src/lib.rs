//! Zoho Bookings client: a fixed table of logical operations issued through
//! an OAuth-gated request wrapper.

pub mod appointment;
pub mod client;
pub mod operation;

pub use {
    appointment::{AppointmentAction, CustomerDetails, NewAppointment},
    client::{AUTH_SCHEME, BookingsClient, Params, Resources},
    operation::{Operation, UnknownOperation},
    sayvai_oauth::{Error, Result},
};
