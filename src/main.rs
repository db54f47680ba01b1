// src/main.rs

//! # Protege OTP Service - Main Entry Point
//!
//! This module serves as the main entry point for the one-time passcode
//! second-factor service. It initializes all core components and starts the
//! API server.
//!
//! ## Architecture Overview
//! 1. **Token Layer**: signed credential encoding, signing, and verification
//! 2. **Services Layer**: code issuance, verification, and API endpoints
//! 3. **Policy Layer**: corporate-domain gate and per-identity rate limiting
//!
//! ## Environment Variables
//! - `OTP_JWT_SECRET`: HMAC secret for signing credentials (falls back to an
//!   insecure development value)
//! - `OTP_DEMO_EXPOSE_CODE`: (Optional) `1`/`true` echoes the raw code in
//!   send-otp responses; off by default
//! - `BIND_ADDR`: (Optional) listen address (default: 127.0.0.1:3000)

use crate::config::AuthConfig;
use crate::services::api_server::ApiServer;
use crate::services::mailer::LogMailer;
use crate::services::otp_issuer::OtpIssuer;
use crate::services::rate_limit::RateLimiter;
use crate::services::verifier::OtpVerifier;
use anyhow::{Context, Result};
use dotenv::dotenv;
use env_logger::Env;
use std::net::SocketAddr;
use std::sync::Arc;

// Module declarations (organized by functional domain)
mod config; // Environment configuration
mod error; // Policy error taxonomy
mod models; // Data structures
mod services; // Business logic and API
mod token; // Signed credential format
mod utils; // Helper functions

/// Main application entry point
///
/// # Initialization Sequence
/// 1. Load environment configuration
/// 2. Initialize logging
/// 3. Wire up the issue and verify services
/// 4. Start API server
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Default to info so the audit lines are visible out of the box
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AuthConfig::from_env();

    // One rate limiter instance covers every issue request
    let rate_limiter = Arc::new(RateLimiter::new());
    let mailer = Arc::new(LogMailer);

    let issuer = OtpIssuer::new(
        config.token_secret.clone(),
        rate_limiter,
        mailer,
        config.expose_demo_code,
    );
    let verifier = OtpVerifier::new(config.token_secret.clone());

    // Initialize API Server with both protocol services
    let api_server = ApiServer::new(issuer, verifier, config.expose_demo_code);

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("invalid BIND_ADDR: {}", config.bind_addr))?;

    println!("API server running at http://{}", addr);
    println!("Available endpoints:");
    println!("- POST /api/send-otp");
    println!("- GET  /api/send-otp");
    println!("- POST /api/verify-otp");
    println!("- GET  /api/verify-otp");

    api_server.run(addr).await
}
