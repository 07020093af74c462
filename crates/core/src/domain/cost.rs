use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostRequestId(pub String);

/// Negotiation status, derived from which cost fields are populated. The
/// backend never stores an explicit status column, so the derivation is the
/// single source of truth on the client side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostStatus {
    /// Created, but no cost figure exists yet.
    Requested,
    Proposed,
    Negotiated,
    /// Terminal.
    Accepted,
}

/// A repair/maintenance cost awaiting proposal, negotiation, and acceptance.
///
/// Cost fields are append-only: a later stage supersedes an earlier figure
/// but never erases it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostRequest {
    pub id: CostRequestId,
    pub request_title: String,
    pub vehicle_info: String,
    pub requested_by: String,
    pub proposed_cost: Option<Decimal>,
    pub negotiated_cost: Option<Decimal>,
    pub accepted_cost: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CostRequest {
    pub fn new(
        id: CostRequestId,
        request_title: impl Into<String>,
        vehicle_info: impl Into<String>,
        requested_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            request_title: request_title.into(),
            vehicle_info: vehicle_info.into(),
            requested_by: requested_by.into(),
            proposed_cost: None,
            negotiated_cost: None,
            accepted_cost: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> CostStatus {
        if self.accepted_cost.is_some() {
            CostStatus::Accepted
        } else if self.negotiated_cost.is_some() {
            CostStatus::Negotiated
        } else if self.proposed_cost.is_some() {
            CostStatus::Proposed
        } else {
            CostStatus::Requested
        }
    }

    /// The amount currently under consideration: the negotiated figure when
    /// one exists, otherwise the original proposal.
    pub fn effective_cost(&self) -> Option<Decimal> {
        self.negotiated_cost.or(self.proposed_cost)
    }

    pub(crate) fn record_proposed_cost(&mut self, amount: Decimal) {
        self.proposed_cost = Some(amount);
        self.touch();
    }

    pub(crate) fn record_negotiated_cost(&mut self, amount: Decimal) {
        self.negotiated_cost = Some(amount);
        self.touch();
    }

    pub(crate) fn record_accepted_cost(&mut self, amount: Decimal) {
        self.accepted_cost = Some(amount);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
