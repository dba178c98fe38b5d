//! Error types with diagnostics using miette
//!
//! Only `CalcError` ever reaches a caller as a failure response.
//! `InsufficientData` is always turned into a placeholder value.

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// Input Errors
// ============================================================================

/// A required numeric input is missing, empty, non-numeric, NaN or infinite.
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq, Eq)]
#[error("insufficient data: `{field}` is missing or not a number")]
#[diagnostic(code(bikefit::input::insufficient_data))]
pub struct InsufficientData {
    /// Wire name of the offending field
    pub field: &'static str,
}

// ============================================================================
// Request Errors
// ============================================================================

/// Errors surfaced to the caller as `{ success: false, error }`
#[derive(Error, Diagnostic, Debug)]
pub enum CalcError {
    #[error("unknown calculation kind: {kind}")]
    #[diagnostic(
        code(bikefit::request::unknown_kind),
        help("expected one of: xy-position, position-simulator, seatpost, stack-reach, stem")
    )]
    UnknownCalculationKind { kind: String },

    #[error("malformed request: {source}")]
    #[diagnostic(
        code(bikefit::request::malformed),
        help("send an object like {{\"calculationKind\": \"xy-position\", \"data\": {{...}}}}")
    )]
    MalformedRequest {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid payload for {kind}: {source}")]
    #[diagnostic(
        code(bikefit::request::invalid_payload),
        help("`data` must be a JSON object")
    )]
    InvalidPayload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode result: {source}")]
    #[diagnostic(code(bikefit::response::encode))]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}
