//! Caller identity and role checks.
//!
//! Token verification happens upstream; by the time a request reaches the
//! portal its subject and role travel as plain headers.

use std::fmt;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const USER_HEADER: &str = "x-portal-user";
pub const ROLE_HEADER: &str = "x-portal-role";

/// Roles that may author postings and their forms.
pub const AUTHORS: &[Role] = &[Role::Admin, Role::Supervisor];
/// Roles that may read every posting, application, and dashboard.
pub const STAFF: &[Role] = &[Role::Admin, Role::Supervisor, Role::Director];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Guest,
    Applicant,
    Admin,
    Supervisor,
    Director,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Guest => "GUEST",
            Role::Applicant => "APPLICANT",
            Role::Admin => "ADMIN",
            Role::Supervisor => "SUPERVISOR",
            Role::Director => "DIRECTOR",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GUEST" => Some(Role::Guest),
            "APPLICANT" => Some(Role::Applicant),
            "ADMIN" => Some(Role::Admin),
            "SUPERVISOR" => Some(Role::Supervisor),
            "DIRECTOR" => Some(Role::Director),
            _ => None,
        }
    }

    pub fn is_staff(self) -> bool {
        STAFF.contains(&self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier of a registered portal user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Option<UserId>,
    pub role: Role,
}

impl Actor {
    pub fn guest() -> Self {
        Self {
            user_id: None,
            role: Role::Guest,
        }
    }

    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: Some(UserId(user_id.into())),
            role,
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn require_user(&self) -> Result<&UserId, AccessError> {
        match (&self.user_id, self.role) {
            (Some(user_id), role) if role != Role::Guest => Ok(user_id),
            _ => Err(AccessError::Unauthenticated),
        }
    }

    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AccessError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else if self.role == Role::Guest {
            Err(AccessError::Unauthenticated)
        } else {
            Err(AccessError::Forbidden { role: self.role })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("role {role} may not perform this operation")]
    Forbidden { role: Role },
    #[error("unrecognised role `{0}`")]
    InvalidRole(String),
}

impl AccessError {
    pub fn status(&self) -> StatusCode {
        match self {
            AccessError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AccessError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AccessError::InvalidRole(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AccessError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let user_id = header(USER_HEADER).map(UserId);
        let role = match header(ROLE_HEADER) {
            Some(raw) => Role::parse(&raw).ok_or(AccessError::InvalidRole(raw))?,
            None if user_id.is_some() => Role::Applicant,
            None => Role::Guest,
        };

        Ok(Self { user_id, role })
    }
}
