use axum::{Router, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{auth, services::documentation::ApiDoc, state::SharedState};

pub mod groups;
pub mod health;
pub mod leaderboard;
pub mod leagues;
pub mod players;
pub mod seasons;
pub mod squads;
pub mod sweep;

/// Compose all route trees. Each subtree opts into exactly one auth gate;
/// public reads carry none, and the Swagger UI rides alongside under
/// `/docs`.
pub fn router(state: SharedState) -> Router<()> {
    let public = health::router()
        .merge(leagues::router())
        .merge(sweep::public_router())
        .merge(seasons::public_router())
        .merge(squads::public_router());

    let user = players::user_router()
        .merge(squads::user_router())
        .merge(groups::router())
        .merge(leaderboard::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::jwt::require_user,
        ));

    let server = players::server_router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::hmac::require_server_signature,
    ));

    let cron = sweep::cron_router()
        .merge(seasons::cron_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::cron::require_cron,
        ));

    let docs: Router<SharedState> =
        SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()).into();

    public
        .merge(user)
        .merge(server)
        .merge(cron)
        .merge(docs)
        .with_state(state)
}
