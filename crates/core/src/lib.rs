pub mod api;
pub mod audit;
pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod routes;

pub use api::{
    CostActionPayload, CostWorkflowGateway, RouteGateway, RoutePayload, RouteUserPayload,
};
pub use audit::{
    AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink, InMemoryAuditSink,
};
pub use config::{ApiConfig, ConfigError, ConfigOverrides, LoadOptions};
pub use domain::cost::{CostRequest, CostRequestId, CostStatus};
pub use domain::route::{RouteAssignment, RouteRole};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use flows::{
    parse_amount, CostEvent, CostFlowError, CostNegotiationFlow, NegotiationAction,
    TransitionOutcome,
};
pub use routes::{RouteValidationError, RouteValidator};
