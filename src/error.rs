use thiserror::Error;

use crate::ai::{Order, Stat};
use crate::id::{FactionId, LocationId, UnitId};
use crate::model::Actionable;

/// Failures raised by the decision core.
///
/// Every variant signals a programming or data-consistency bug. Pairings
/// that merely do not apply, or actions with no viable pairing, are not
/// errors and never surface here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AiError {
    #[error("action `{action}` cannot select an order for {subject:?} -> {target:?}")]
    KindMismatch {
        action: &'static str,
        subject: Option<Actionable>,
        target: Option<Actionable>,
    },

    #[error("profile has no utility for stat `{0}`")]
    MissingStatUtility(Stat),

    #[error("profile has no utility for order `{0}`")]
    MissingOrderUtility(Order),

    #[error("{0} is unknown to this world state")]
    UnknownFaction(FactionId),

    #[error("{0} does not exist")]
    UnknownUnit(UnitId),

    #[error("{0} does not exist")]
    UnknownLocation(LocationId),

    #[error("no profile registered under `{0}`")]
    UnknownProfile(String),
}

/// Failures loading a [`SimConfig`](crate::config::SimConfig) or a custom
/// [`Profile`](crate::ai::Profile).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
