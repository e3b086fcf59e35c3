// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use barberbook_core::{BarberError, Role};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::token::token_hash;

/// A signed-in user. Holds the bearer token, so it is not `Clone` and its
/// `Debug` output omits the token.
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
    token: SecretString,
}

impl Session {
    pub(crate) fn new(
        user_id: String,
        email: String,
        role: Role,
        expires_at: DateTime<Utc>,
        token: SecretString,
    ) -> Self {
        Self {
            user_id,
            email,
            role,
            expires_at,
            token,
        }
    }

    /// The bearer token, for handing to the credential cache.
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub(crate) fn token_hash(&self) -> String {
        token_hash(self.token.expose_secret())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Fail unless the session belongs to a user with `role`.
    pub fn require_role(&self, role: Role) -> Result<(), BarberError> {
        if self.role == role {
            Ok(())
        } else {
            Err(BarberError::Unauthorized(format!(
                "This action requires a {role} account"
            )))
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("expires_at", &self.expires_at)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(role: Role) -> Session {
        Session::new(
            "U1".into(),
            "u1@example.com".into(),
            role,
            Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
            SecretString::from("tok".to_string()),
        )
    }

    #[test]
    fn role_gate() {
        assert!(session(Role::Barber).require_role(Role::Barber).is_ok());
        let err = session(Role::Customer).require_role(Role::Barber).unwrap_err();
        assert_eq!(err.user_message(), "This action requires a barber account");
    }

    #[test]
    fn expiry_is_inclusive() {
        let s = session(Role::Customer);
        assert!(!s.is_expired_at(s.expires_at - chrono::Duration::seconds(1)));
        assert!(s.is_expired_at(s.expires_at));
    }

    #[test]
    fn debug_hides_token() {
        assert!(!format!("{:?}", session(Role::Customer)).contains("tok\""));
    }
}
