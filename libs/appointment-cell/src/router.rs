use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware,
    Extension,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::booking::WizardStore;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    let store = Arc::new(WizardStore::new());

    Router::new()
        .route("/", get(handlers::list_appointments))
        .route("/wizard", post(handlers::start_wizard))
        .route("/wizard", get(handlers::get_wizard))
        .route("/wizard/specialty", put(handlers::choose_specialty))
        .route("/wizard/doctor", put(handlers::choose_doctor))
        .route("/wizard/date", put(handlers::choose_date))
        .route("/wizard/slots", post(handlers::reload_slots))
        .route("/wizard/time", put(handlers::choose_time))
        .route("/wizard/details", put(handlers::set_details))
        .route("/wizard/submit", post(handlers::submit_wizard))
        .route("/wizard/reset", post(handlers::reset_wizard))
        .layer(Extension(store))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
