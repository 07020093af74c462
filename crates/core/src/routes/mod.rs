use thiserror::Error;

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::domain::route::{RouteAssignment, RouteRole};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RouteValidationError {
    #[error("route is missing required roles: {}", join_roles(.0))]
    MissingRoles(Vec<RouteRole>),
    #[error("route assigns more than one user to: {}", join_roles(.0))]
    DuplicateRoles(Vec<RouteRole>),
    #[error("route assignments must follow the order Comment, Review, Commit, Approve")]
    OrderViolation,
}

fn join_roles(roles: &[RouteRole]) -> String {
    roles.iter().map(|role| role.as_str()).collect::<Vec<_>>().join(", ")
}

/// Validates a candidate approval route before it is submitted to the
/// backend. Checks run in a fixed order and short-circuit, so the UI always
/// surfaces one actionable message at a time: missing roles first, then
/// duplicates, then assignment ordering.
#[derive(Clone, Copy, Debug, Default)]
pub struct RouteValidator;

impl RouteValidator {
    pub fn new() -> Self {
        Self
    }

    /// Pure check over the candidate assignment list. Call it on every
    /// mutation of the list and once more before submission.
    pub fn validate(&self, users: &[RouteAssignment]) -> Result<(), RouteValidationError> {
        let mut counts = [0usize; RouteRole::ALL.len()];
        for user in users {
            counts[usize::from(user.role.rank())] += 1;
        }

        let missing: Vec<RouteRole> = RouteRole::ALL
            .into_iter()
            .filter(|role| counts[usize::from(role.rank())] == 0)
            .collect();
        if !missing.is_empty() {
            return Err(RouteValidationError::MissingRoles(missing));
        }

        let duplicated: Vec<RouteRole> = RouteRole::ALL
            .into_iter()
            .filter(|role| counts[usize::from(role.rank())] > 1)
            .collect();
        if !duplicated.is_empty() {
            return Err(RouteValidationError::DuplicateRoles(duplicated));
        }

        // Each role appears exactly once past this point, so every position
        // lookup succeeds and the pairwise comparison is well defined.
        for pair in RouteRole::ALL.windows(2) {
            let earlier = position_of(users, pair[0]);
            let later = position_of(users, pair[1]);
            if earlier > later {
                return Err(RouteValidationError::OrderViolation);
            }
        }

        Ok(())
    }

    /// True iff the route is submittable: exactly one user per canonical
    /// role, listed in canonical order.
    pub fn can_save(&self, users: &[RouteAssignment]) -> bool {
        users.len() == RouteRole::ALL.len() && self.validate(users).is_ok()
    }

    pub fn validate_with_audit<S>(
        &self,
        users: &[RouteAssignment],
        sink: &S,
        audit: &AuditContext,
    ) -> Result<(), RouteValidationError>
    where
        S: AuditSink,
    {
        let result = self.validate(users);
        match &result {
            Ok(()) => {
                sink.emit(
                    AuditEvent::new(
                        audit.request_id.clone(),
                        audit.route_name.clone(),
                        audit.correlation_id.clone(),
                        "route.validation_passed",
                        AuditCategory::Route,
                        audit.actor.clone(),
                        AuditOutcome::Success,
                    )
                    .with_metadata("assignments", users.len().to_string()),
                );
            }
            Err(error) => {
                sink.emit(
                    AuditEvent::new(
                        audit.request_id.clone(),
                        audit.route_name.clone(),
                        audit.correlation_id.clone(),
                        "route.validation_failed",
                        AuditCategory::Route,
                        audit.actor.clone(),
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("error", error.to_string()),
                );
            }
        }
        result
    }
}

fn position_of(users: &[RouteAssignment], role: RouteRole) -> usize {
    users.iter().position(|user| user.role == role).unwrap_or(usize::MAX)
}
