use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Approval roles a route must cover, declared in canonical traversal order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RouteRole {
    Comment,
    Review,
    Commit,
    Approve,
}

impl RouteRole {
    /// Canonical order: Comment < Review < Commit < Approve.
    pub const ALL: [RouteRole; 4] =
        [RouteRole::Comment, RouteRole::Review, RouteRole::Commit, RouteRole::Approve];

    pub fn rank(self) -> u8 {
        match self {
            Self::Comment => 0,
            Self::Review => 1,
            Self::Commit => 2,
            Self::Approve => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "Comment",
            Self::Review => "Review",
            Self::Commit => "Commit",
            Self::Approve => "Approve",
        }
    }
}

impl fmt::Display for RouteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RouteRole {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "comment" => Ok(Self::Comment),
            "review" => Ok(Self::Review),
            "commit" => Ok(Self::Commit),
            "approve" => Ok(Self::Approve),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown route role `{other}` (expected Comment|Review|Commit|Approve)"
            ))),
        }
    }
}

/// One (role -> user) entry in a candidate approval route. List position is
/// significant: routes are traversed in assignment order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAssignment {
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub role: RouteRole,
}
