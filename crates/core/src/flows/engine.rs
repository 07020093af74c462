use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::domain::cost::{CostRequest, CostStatus};
use crate::flows::states::{CostEvent, NegotiationAction, TransitionOutcome};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CostFlowError {
    #[error("a cost has already been proposed for this request")]
    AlreadyProposed,
    #[error("cannot {action} a cost request that is {status:?}")]
    InvalidState { status: CostStatus, action: &'static str },
    #[error("no cost has been proposed or negotiated yet")]
    NoCostSet,
    #[error("cost amounts must not be negative, got {0}")]
    NegativeAmount(Decimal),
    #[error("could not parse `{0}` as a currency amount")]
    InvalidAmount(String),
}

/// Parses form text into a fixed-point currency amount. Decimal parsing is
/// deliberate here: binary floats would drift on comparisons like
/// `85.50 == accepted`.
pub fn parse_amount(raw: &str) -> Result<Decimal, CostFlowError> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| CostFlowError::InvalidAmount(raw.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CostFlowError::NegativeAmount(amount));
    }
    Ok(amount)
}

/// The one place cost-negotiation transitions are decided. UI modals
/// (proposal, negotiation, acceptance) all funnel through `apply`, so the
/// accepted amount is always read from the request passed in, never from a
/// stale copy held by another view.
#[derive(Clone, Copy, Debug, Default)]
pub struct CostNegotiationFlow;

impl CostNegotiationFlow {
    pub fn new() -> Self {
        Self
    }

    pub fn initial_status(&self) -> CostStatus {
        CostStatus::Requested
    }

    /// Applies one event to the request. The request is mutated only when
    /// the transition is legal; on failure it is returned untouched and the
    /// typed error is the caller's to surface.
    pub fn apply(
        &self,
        request: &mut CostRequest,
        event: &CostEvent,
    ) -> Result<TransitionOutcome, CostFlowError> {
        if let Some(amount) = event.amount() {
            if amount.is_sign_negative() && !amount.is_zero() {
                return Err(CostFlowError::NegativeAmount(amount));
            }
        }

        let from = request.status();
        let (to, actions) = transition(from, event)?;

        match event {
            CostEvent::Propose { amount, .. } => request.record_proposed_cost(*amount),
            CostEvent::Negotiate { amount, .. } => request.record_negotiated_cost(*amount),
            CostEvent::Accept { .. } => {
                let effective = request.effective_cost().ok_or(CostFlowError::NoCostSet)?;
                request.record_accepted_cost(effective);
            }
        }

        Ok(TransitionOutcome { from, to, event: event.clone(), actions })
    }

    pub fn apply_with_audit<S>(
        &self,
        request: &mut CostRequest,
        event: &CostEvent,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<TransitionOutcome, CostFlowError>
    where
        S: AuditSink,
    {
        let result = self.apply(request, event);
        match &result {
            Ok(outcome) => {
                sink.emit(
                    AuditEvent::new(
                        Some(request.id.clone()),
                        audit.route_name.clone(),
                        audit.correlation_id.clone(),
                        "negotiation.transition_applied",
                        AuditCategory::Negotiation,
                        audit.actor.clone(),
                        AuditOutcome::Success,
                    )
                    .with_metadata("from", format!("{:?}", outcome.from))
                    .with_metadata("to", format!("{:?}", outcome.to))
                    .with_metadata("event", outcome.event.name()),
                );
            }
            Err(error) => {
                sink.emit(
                    AuditEvent::new(
                        Some(request.id.clone()),
                        audit.route_name.clone(),
                        audit.correlation_id.clone(),
                        "negotiation.transition_rejected",
                        AuditCategory::Negotiation,
                        audit.actor.clone(),
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("event", event.name())
                    .with_metadata("error", error.to_string()),
                );
            }
        }
        result
    }
}

fn transition(
    current: CostStatus,
    event: &CostEvent,
) -> Result<(CostStatus, Vec<NegotiationAction>), CostFlowError> {
    use CostStatus::{Accepted, Negotiated, Proposed, Requested};
    use NegotiationAction::{CloseRequest, RecordNegotiatedCost, RecordProposedCost};

    match (current, event) {
        (Accepted, _) => {
            Err(CostFlowError::InvalidState { status: Accepted, action: event.name() })
        }
        (Requested, CostEvent::Propose { .. }) => Ok((Proposed, vec![RecordProposedCost])),
        (Proposed | Negotiated, CostEvent::Propose { .. }) => Err(CostFlowError::AlreadyProposed),
        (Proposed | Negotiated, CostEvent::Negotiate { .. }) => {
            Ok((Negotiated, vec![RecordNegotiatedCost]))
        }
        (Proposed | Negotiated, CostEvent::Accept { .. }) => Ok((Accepted, vec![CloseRequest])),
        (Requested, CostEvent::Negotiate { .. } | CostEvent::Accept { .. }) => {
            Err(CostFlowError::NoCostSet)
        }
    }
}
