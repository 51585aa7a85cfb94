use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{councils, handlers, middleware::metrics_middleware, moderngov};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // One route per upstream operation
    let moderngov_routes = Router::new()
        .route("/councillors-by-ward", get(moderngov::councillors_by_ward))
        .route("/councillors-by-ward-id", get(moderngov::councillors_by_ward_id))
        .route("/councillors-by-postcode", get(moderngov::councillors_by_postcode))
        .route("/committees", get(moderngov::committees))
        .route("/meetings", get(moderngov::meetings))
        .route("/meeting", get(moderngov::meeting))
        .route("/meetings-by-date", get(moderngov::meetings_by_date))
        .route("/calendar-events", get(moderngov::calendar_events))
        .route("/parish-councils", get(moderngov::parish_councils))
        .route("/election-results", get(moderngov::election_results))
        .route("/webcast-meetings", get(moderngov::webcast_meetings))
        .route(
            "/representatives-and-wards",
            get(moderngov::representatives_and_wards),
        )
        .route(
            "/representatives-by-postcode",
            get(moderngov::representatives_by_postcode),
        )
        .route("/rate-limits", get(moderngov::rate_limits));

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Council lookup against the reference list
        .route("/councils", get(councils::list_councils))
        .route("/councils/search", get(councils::search_councils))
        .route("/councils/best", get(councils::best_match))
        .route("/councils/region", get(councils::by_region))
        .route("/councils/type", get(councils::by_type))
        .route("/councils/regions", get(councils::list_regions))
        .route("/councils/types", get(councils::list_types))
        .nest("/moderngov", moderngov_routes)
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
