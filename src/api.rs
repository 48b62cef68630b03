//! HTTP service shell: metadata, cross-origin policy and the liveness probe.

use axum::{Json, Router, routing::get};
use http::HeaderValue;
use http::header::InvalidHeaderValue;
use serde::Serialize;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::Settings;

/// Descriptive metadata advertised by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub name: String,
    pub description: String,
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: "Jobs CRM Assistant".to_string(),
            description: "AI-powered CRM Assistant for job applications".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Cross-origin policy applied to every route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Any origin, method and header, with credentials. Not for production.
    #[default]
    Permissive,
    /// Only the listed origins; methods and headers are mirrored.
    AllowList(Vec<String>),
}

impl CorsPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        match &settings.cors_allow_origins {
            Some(origins) if !origins.iter().any(|o| o == "*") => {
                CorsPolicy::AllowList(origins.clone())
            }
            _ => CorsPolicy::Permissive,
        }
    }

    pub fn is_permissive(&self) -> bool {
        matches!(self, CorsPolicy::Permissive)
    }

    /// Build the tower layer. Fails if an origin is not a valid header value.
    pub fn layer(&self) -> Result<CorsLayer, InvalidHeaderValue> {
        // Browsers reject a literal `*` when credentials are allowed, so the
        // permissive policy echoes the request instead.
        let layer = match self {
            CorsPolicy::AllowList(origins) if origins.iter().any(|o| o == "*") => {
                CorsLayer::very_permissive()
            }
            CorsPolicy::Permissive => CorsLayer::very_permissive(),
            CorsPolicy::AllowList(origins) => {
                let origins = origins
                    .iter()
                    .map(|origin| HeaderValue::from_str(origin))
                    .collect::<Result<Vec<_>, _>>()?;

                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(AllowMethods::mirror_request())
                    .allow_headers(AllowHeaders::mirror_request())
                    .allow_credentials(true)
            }
        };
        Ok(layer)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe. Reports only that the process is serving requests.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Build the service router.
pub fn router(cors: &CorsPolicy) -> Result<Router, InvalidHeaderValue> {
    Ok(Router::new()
        .route("/health", get(health))
        .layer(cors.layer()?))
}
