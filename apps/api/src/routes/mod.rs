pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::award::handlers as award_handlers;
use crate::dispatch::handlers as dispatch_handlers;
use crate::proposals::handlers as proposal_handlers;
use crate::rfp::handlers as rfp_handlers;
use crate::state::AppState;
use crate::vendors::handlers as vendor_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // RFP intake
        .route(
            "/api/v1/rfps",
            post(rfp_handlers::handle_create_rfp).get(rfp_handlers::handle_list_rfps),
        )
        .route("/api/v1/rfps/:id", get(rfp_handlers::handle_get_rfp))
        // Vendor registry
        .route(
            "/api/v1/vendors",
            get(vendor_handlers::handle_list_vendors).post(vendor_handlers::handle_create_vendor),
        )
        // Mail dispatch
        .route(
            "/api/v1/rfps/:id/send",
            post(dispatch_handlers::handle_send_rfp),
        )
        .route(
            "/api/v1/rfps/:id/dispatches",
            get(dispatch_handlers::handle_list_dispatches),
        )
        // Vendor replies
        .route(
            "/api/v1/rfps/:id/responses",
            post(proposal_handlers::handle_submit_response)
                .get(proposal_handlers::handle_list_responses),
        )
        // Comparison / award
        .route(
            "/api/v1/rfps/:id/compare",
            post(award_handlers::handle_compare),
        )
        .route(
            "/api/v1/rfps/:id/comparison",
            get(award_handlers::handle_get_comparison),
        )
        .with_state(state)
}
