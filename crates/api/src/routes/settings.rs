use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/settings/business-hours",
        get(handlers::settings::get_business_hours).put(handlers::settings::update_business_hours),
    )
}
