// src/error.rs
//! Protocol error taxonomy.
//!
//! Every failure of the issue or verify operations is one of these variants.
//! None of them is recoverable inline (the caller must re-prompt the user or
//! request a fresh code), so each carries its final user-facing message as
//! its `Display` implementation (in Portuguese: these strings are the API
//! contract with the existing corporate UI). The mapping to HTTP status codes
//! lives at the transport boundary, not here.

use thiserror::Error;

/// Failures of the OTP issue and verify operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The claimed identity is not on the corporate domain.
    #[error("Acesso restrito a usuários Protege.")]
    DomainRejected,

    /// Too many issuance requests for this identity in the current window.
    #[error("Muitas tentativas. Tente novamente em {retry_after_minutes} minuto(s).")]
    RateLimited {
        /// Whole minutes (rounded up) until the window resets.
        retry_after_minutes: i64,
    },

    /// One or more required fields is missing or empty.
    #[error("Campos ausentes.")]
    MissingFields,

    /// The submitted code is not 6 digits after normalization.
    #[error("Código inválido.")]
    InvalidCodeFormat,

    /// The credential is malformed or its signature does not verify.
    #[error("Token inválido.")]
    InvalidToken,

    /// The credential's validity window has passed.
    #[error("Código expirado.")]
    CodeExpired,

    /// The credential was issued for a different identity.
    #[error("E-mail divergente.")]
    IdentityMismatch,

    /// The submitted code does not match the one in the credential.
    #[error("Código incorreto.")]
    IncorrectCode,

    /// Unexpected failure. Detail is logged server-side; the caller only
    /// ever sees this generic message.
    #[error("Erro interno na API.")]
    Internal(#[source] anyhow::Error),
}
