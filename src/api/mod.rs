// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        CheckUserRequest, CheckUserResponse, DeleteUserRequest, DeleteUserResponse,
        EncryptedWalletExport, ExportWalletRequest, ExportWalletResponse,
        UpdateWalletPolicyRequest, UpdateWalletPolicyResponse, UserSummary,
    },
    state::AppState,
};

pub mod health;
pub mod users;
pub mod wallets;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/check-user-by-email", post(users::check_user_by_email))
        .route("/delete-user", post(users::delete_user))
        .route("/export-wallet", post(wallets::export_wallet))
        .route("/update-wallet-policy", post(wallets::update_wallet_policy));

    let health_routes = Router::new()
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::readiness,
        users::check_user_by_email,
        users::delete_user,
        wallets::export_wallet,
        wallets::update_wallet_policy
    ),
    components(
        schemas(
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks,
            CheckUserRequest,
            CheckUserResponse,
            UserSummary,
            DeleteUserRequest,
            DeleteUserResponse,
            ExportWalletRequest,
            ExportWalletResponse,
            EncryptedWalletExport,
            UpdateWalletPolicyRequest,
            UpdateWalletPolicyResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Users", description = "Privy user lookup and deletion"),
        (name = "Wallets", description = "Privy wallet export and policies")
    )
)]
struct ApiDoc;
