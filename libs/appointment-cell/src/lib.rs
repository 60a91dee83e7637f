pub mod handlers;
pub mod router;
pub mod models;
pub mod services;

pub use models::*;
pub use services::wizard::{BookingWizard, WizardStep, BOOKING_HORIZON_DAYS};
pub use services::booking::BookingService;
