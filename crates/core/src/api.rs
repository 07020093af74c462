use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::cost::{CostRequest, CostRequestId};
use crate::domain::route::{RouteAssignment, RouteRole};
use crate::errors::ApplicationError;
use crate::flows::CostEvent;
use crate::routes::{RouteValidationError, RouteValidator};

/// Wire shape for `POST/PUT /api/Routes`. Field names are owned by the
/// backend, hence the camelCase rename.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteUserPayload {
    pub user_email: String,
    pub user_id: String,
    pub role: RouteRole,
}

impl From<&RouteAssignment> for RouteUserPayload {
    fn from(assignment: &RouteAssignment) -> Self {
        Self {
            user_email: assignment.user_email.clone(),
            user_id: assignment.user_id.clone(),
            role: assignment.role,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePayload {
    pub name: String,
    pub department: String,
    pub description: String,
    pub users: Vec<RouteUserPayload>,
}

impl RoutePayload {
    /// Construction runs the route validator, so an invalid assignment list
    /// can never be serialized for submission.
    pub fn new(
        name: impl Into<String>,
        department: impl Into<String>,
        description: impl Into<String>,
        users: &[RouteAssignment],
    ) -> Result<Self, RouteValidationError> {
        RouteValidator::new().validate(users)?;
        Ok(Self {
            name: name.into(),
            department: department.into(),
            description: description.into(),
            users: users.iter().map(RouteUserPayload::from).collect(),
        })
    }
}

/// Body submitted by the propose/negotiate/accept endpoints. Acceptance
/// carries no amount; the backend binds the effective cost server-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostActionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    pub comments: String,
}

impl From<&CostEvent> for CostActionPayload {
    fn from(event: &CostEvent) -> Self {
        Self { amount: event.amount(), comments: event.comments().to_string() }
    }
}

/// REST seam for route persistence. Implemented by the UI layer; the core
/// never awaits it internally.
#[async_trait]
pub trait RouteGateway: Send + Sync {
    async fn save_route(&self, payload: &RoutePayload) -> Result<(), ApplicationError>;
}

/// REST seam for the cost workflow endpoints. Each call returns the updated
/// request representation the backend persisted.
#[async_trait]
pub trait CostWorkflowGateway: Send + Sync {
    async fn propose(
        &self,
        request_id: &CostRequestId,
        payload: &CostActionPayload,
    ) -> Result<CostRequest, ApplicationError>;

    async fn negotiate(
        &self,
        request_id: &CostRequestId,
        payload: &CostActionPayload,
    ) -> Result<CostRequest, ApplicationError>;

    async fn accept(
        &self,
        request_id: &CostRequestId,
        payload: &CostActionPayload,
    ) -> Result<CostRequest, ApplicationError>;
}
