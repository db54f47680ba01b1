// src/services/api_server.rs
//! API Server for the one-time passcode service.
//!
//! This module provides the REST API interface for the second-factor flow,
//! translating HTTP requests into calls on the issue and verify services and
//! mapping their errors onto status codes and Portuguese user messages.
//!
//! The API is built using Axum and includes endpoints for:
//! - Issuing a one-time code and its signed credential (POST /api/send-otp)
//! - Verifying a submitted code against its credential (POST /api/verify-otp)
//! - Liveness checks on both paths (GET)
//!
//! CORS allows any origin: the dashboard frontend is served from a different
//! origin, and the endpoints carry no cookies or ambient authority.

use crate::error::AuthError;
use crate::services::otp_issuer::OtpIssuer;
use crate::services::verifier::OtpVerifier;
use anyhow::{Context, Result};
use axum::{
    extract::{Json, State},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use log::error;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

// API request and response structures

/// Request payload for issuing a one-time code
#[derive(Serialize, Deserialize)]
struct SendOtpRequest {
    email: Option<String>,
}

/// Response for the issue operation
#[derive(Serialize, Deserialize)]
struct SendOtpResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Request payload for verifying a submitted code
#[derive(Serialize, Deserialize)]
struct VerifyOtpRequest {
    email: Option<String>,
    code: Option<String>,
    token: Option<String>,
}

/// Response for the verify operation
#[derive(Serialize, Deserialize)]
struct VerifyOtpResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Response for the liveness checks
#[derive(Serialize, Deserialize)]
struct StatusResponse {
    message: String,
}

/// API server state containing the two protocol services
pub struct ApiServer {
    /// Service that issues codes and signed credentials
    issuer: Arc<OtpIssuer>,

    /// Service that checks submitted codes
    verifier: Arc<OtpVerifier>,

    /// Whether the raw code is echoed back in the send-otp response
    expose_demo_code: bool,
}

impl ApiServer {
    /// Creates a new instance of the API server
    ///
    /// # Arguments
    /// * `issuer` - Service for code issuance
    /// * `verifier` - Service for code verification
    /// * `expose_demo_code` - Whether responses include the raw code (demo
    ///   deployments only)
    pub fn new(issuer: OtpIssuer, verifier: OtpVerifier, expose_demo_code: bool) -> Self {
        ApiServer {
            issuer: Arc::new(issuer),
            verifier: Arc::new(verifier),
            expose_demo_code,
        }
    }

    /// Builds the application router with all routes and the CORS layer.
    pub fn router(&self) -> Router {
        Router::new()
            .route(
                "/api/send-otp",
                post(Self::send_otp_handler).get(Self::send_otp_status_handler),
            )
            .route(
                "/api/verify-otp",
                post(Self::verify_otp_handler).get(Self::verify_otp_status_handler),
            )
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE]),
            )
            .with_state(Arc::new(self.clone())) // Share the entire ApiServer state
    }

    /// Starts the API server and begins listening for requests
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "127.0.0.1:3000")
    pub async fn run(&self, addr: SocketAddr) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        axum::serve(listener, self.router())
            .await
            .context("server stopped unexpectedly")?;

        Ok(())
    }

    // =====================
    // OTP Handlers
    // =====================

    /// Issues a one-time code for a corporate e-mail address
    ///
    /// # Endpoint
    /// POST /api/send-otp
    ///
    /// # Request Body
    /// JSON payload containing the user's e-mail address
    ///
    /// # Responses
    /// - 200 OK: Returns the signed credential (and the raw code in demo mode)
    /// - 400 Bad Request: Missing e-mail
    /// - 403 Forbidden: Address outside the corporate domain
    /// - 429 Too Many Requests: Issuance rate limit hit
    /// - 500 Internal Server Error: Signing or delivery failed
    async fn send_otp_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<SendOtpRequest>,
    ) -> impl IntoResponse {
        let email = payload.email.unwrap_or_default();
        if email.trim().is_empty() {
            return (
                StatusCode::BAD_REQUEST,
                Json(SendOtpResponse {
                    success: false,
                    token: None,
                    code: None,
                    error: Some("E-mail é obrigatório.".to_string()),
                }),
            );
        }

        match state.issuer.request_code(&email) {
            Ok(issued) => {
                // The raw code leaves the server only in demo deployments;
                // everyone else gets it over the delivery channel.
                let code = if state.expose_demo_code {
                    Some(issued.code)
                } else {
                    None
                };
                (
                    StatusCode::OK,
                    Json(SendOtpResponse {
                        success: true,
                        token: Some(issued.token),
                        code,
                        error: None,
                    }),
                )
            }
            Err(e) => {
                if let AuthError::Internal(source) = &e {
                    error!("[ERROR] send-otp: {:#}", source);
                }
                (
                    Self::status_for(&e),
                    Json(SendOtpResponse {
                        success: false,
                        token: None,
                        code: None,
                        error: Some(e.to_string()),
                    }),
                )
            }
        }
    }

    /// Verifies a submitted code against its credential
    ///
    /// # Endpoint
    /// POST /api/verify-otp
    ///
    /// # Request Body
    /// JSON payload containing e-mail, code and the issued credential
    ///
    /// # Responses
    /// - 200 OK: Second factor satisfied
    /// - 400 Bad Request: Missing fields or malformed code
    /// - 401 Unauthorized: Bad credential, expired code, or wrong code
    /// - 403 Forbidden: Credential was issued to a different identity
    /// - 500 Internal Server Error: Verification failed internally
    async fn verify_otp_handler(
        State(state): State<Arc<ApiServer>>,
        Json(payload): Json<VerifyOtpRequest>,
    ) -> impl IntoResponse {
        let email = payload.email.unwrap_or_default();
        let code = payload.code.unwrap_or_default();
        let token = payload.token.unwrap_or_default();

        match state.verifier.verify(&email, &code, &token) {
            Ok(()) => (
                StatusCode::OK,
                Json(VerifyOtpResponse {
                    success: true,
                    error: None,
                }),
            ),
            Err(e) => {
                if let AuthError::Internal(source) = &e {
                    error!("[ERROR] verify-otp: {:#}", source);
                }
                (
                    Self::status_for(&e),
                    Json(VerifyOtpResponse {
                        success: false,
                        error: Some(e.to_string()),
                    }),
                )
            }
        }
    }

    // =====================
    // Liveness Handlers
    // =====================

    /// Liveness check for the issue path
    ///
    /// # Endpoint
    /// GET /api/send-otp
    async fn send_otp_status_handler() -> impl IntoResponse {
        Json(StatusResponse {
            message: "API send-otp está online e pronta.".to_string(),
        })
    }

    /// Liveness check for the verify path
    ///
    /// # Endpoint
    /// GET /api/verify-otp
    async fn verify_otp_status_handler() -> impl IntoResponse {
        Json(StatusResponse {
            message: "API verify-otp online.".to_string(),
        })
    }

    /// Maps a policy error onto its HTTP status code.
    fn status_for(error: &AuthError) -> StatusCode {
        match error {
            AuthError::DomainRejected | AuthError::IdentityMismatch => StatusCode::FORBIDDEN,
            AuthError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AuthError::MissingFields | AuthError::InvalidCodeFormat => StatusCode::BAD_REQUEST,
            AuthError::InvalidToken | AuthError::CodeExpired | AuthError::IncorrectCode => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Implement Clone for ApiServer to use with Axum's State
impl Clone for ApiServer {
    fn clone(&self) -> Self {
        ApiServer {
            issuer: Arc::clone(&self.issuer),
            verifier: Arc::clone(&self.verifier),
            expose_demo_code: self.expose_demo_code,
        }
    }
}
