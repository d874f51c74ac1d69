use stockroom_auth::Role;
use stockroom_core::UserId;

/// Resolved identity for a request (verified token claims).
///
/// Inserted by the auth middleware and passed explicitly to handlers via
/// request extensions; domain calls receive it as a value, never read it
/// from shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestIdentity {
    user_id: UserId,
    role: Role,
}

impl RequestIdentity {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
