//! Error kinds for the simulation engine.

use thiserror::Error;

/// Fatal and reportable error conditions.
///
/// `ConfigInvalid` and `InvariantViolation` are always fatal. `ExhaustedDraw`
/// is fatal only for the trip attempt that hit it (the caller drops that
/// request for the current block; it is not retried). Equilibration clamps
/// are not represented here at all — they are non-fatal and are reported on
/// the [`crate::observation::Observation`] snapshot instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("invariant violation at block {block}: {detail}")]
    InvariantViolation { block: u64, detail: String },

    #[error("exhausted {attempts} draws sampling trip endpoints at block {block}")]
    ExhaustedDraw { block: u64, attempts: u32 },
}
