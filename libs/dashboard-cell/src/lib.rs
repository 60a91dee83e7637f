pub mod handlers;
pub mod router;
pub mod models;
pub mod services;

pub use models::*;
pub use services::sections::{sections_for_role, stat_cards_for_role};
