//! Agent tool convention (name, description, JSON parameter schema, execute)
//! and the booking tools built on it.

pub mod booking;
pub mod registry;

pub use {
    booking::{
        BookAppointmentTool, CheckAvailabilityTool, GetAppointmentTool, RescheduleAppointmentTool,
        UpdateAppointmentTool, register_booking_tools,
    },
    registry::{AgentTool, ToolRegistry},
};
