use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::cost::CostStatus;

/// User actions that move a cost request forward. Amounts arrive already
/// parsed; see [`crate::flows::parse_amount`] for the form-text boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostEvent {
    Propose { amount: Decimal, comments: String },
    Negotiate { amount: Decimal, comments: String },
    Accept { comments: String },
}

impl CostEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Propose { .. } => "propose",
            Self::Negotiate { .. } => "negotiate",
            Self::Accept { .. } => "accept",
        }
    }

    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Propose { amount, .. } | Self::Negotiate { amount, .. } => Some(*amount),
            Self::Accept { .. } => None,
        }
    }

    pub fn comments(&self) -> &str {
        match self {
            Self::Propose { comments, .. }
            | Self::Negotiate { comments, .. }
            | Self::Accept { comments } => comments,
        }
    }
}

/// Follow-ups the UI adapter performs after a successful transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationAction {
    RecordProposedCost,
    RecordNegotiatedCost,
    CloseRequest,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: CostStatus,
    pub to: CostStatus,
    pub event: CostEvent,
    pub actions: Vec<NegotiationAction>,
}
