// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use barberbook_config::model::AuthConfig;
use barberbook_core::traits::AccountStore;
use barberbook_core::{Account, BarberError, Clock, Role, SessionRecord, Shop, UserProfile};
use barberbook_resilience::{RetryPolicy, with_retry};
use barberbook_shops::ShopService;
use chrono::Duration;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::password::{MIN_PASSWORD_LEN, hash_password, verify_password};
use crate::session::Session;
use crate::token::{new_session_token, new_verification_token, token_hash};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const SESSION_EXPIRED: &str = "Your session has expired, please sign in again";

/// Shop created together with a barber account.
#[derive(Debug, Clone)]
pub struct ShopDetails {
    pub name: String,
    pub location: Option<String>,
}

pub struct SignUp {
    pub email: String,
    pub password: SecretString,
    pub name: String,
    pub phone: String,
    pub role: Role,
    /// Required for barbers, ignored for customers.
    pub shop: Option<ShopDetails>,
}

#[derive(Debug)]
pub struct SignUpOutcome {
    pub profile: UserProfile,
    pub shop: Option<Shop>,
    /// To be delivered to the user by email. Delivery happens elsewhere.
    pub verification_token: String,
}

fn normalize_email(email: &str) -> Result<String, BarberError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(BarberError::Validation(
            "Please enter a valid email address".into(),
        ))
    }
}

async fn blocking<T, F>(f: F) -> Result<T, BarberError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| BarberError::Internal(format!("password task failed: {e}")))
}

pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    shops: Arc<ShopService>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    session_ttl: Duration,
    require_verified_email: bool,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        shops: Arc<ShopService>,
        clock: Arc<dyn Clock>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            accounts,
            shops,
            clock,
            retry: RetryPolicy::default(),
            session_ttl: Duration::hours(i64::from(config.session_ttl_hours)),
            require_verified_email: config.require_verified_email,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn sign_up(&self, request: SignUp) -> Result<SignUpOutcome, BarberError> {
        let email = normalize_email(&request.email)?;
        if request.password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
            return Err(BarberError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let name = request.name.trim();
        if name.is_empty() {
            return Err(BarberError::Validation("Name is required".into()));
        }
        let shop_details = match (request.role, request.shop) {
            (Role::Barber, Some(shop)) if !shop.name.trim().is_empty() => Some(shop),
            (Role::Barber, _) => {
                return Err(BarberError::Validation("Shop name is required".into()));
            }
            (Role::Customer, _) => None,
        };

        let existing = with_retry(&self.retry, || self.accounts.account_by_email(&email)).await?;
        if existing.is_some() {
            return Err(BarberError::Conflict(
                "An account with this email already exists".into(),
            ));
        }

        let password = request.password;
        let password_hash =
            blocking(move || hash_password(password.expose_secret())).await??;
        let verification_token = new_verification_token()?;
        let account = Account {
            profile: UserProfile {
                id: Uuid::new_v4().to_string(),
                email,
                name: name.to_string(),
                phone: request.phone.trim().to_string(),
                role: request.role,
                email_verified: false,
                created_at: self.clock.now(),
            },
            password_hash,
            verification_token: Some(verification_token.clone()),
        };

        let inserted = with_retry(&self.retry, || self.accounts.insert_account(&account)).await?;
        if !inserted {
            // A retried attempt may have committed this very account.
            let stored = with_retry(&self.retry, || self.accounts.profile(&account.profile.id))
                .await?;
            if stored.is_none() {
                return Err(BarberError::Conflict(
                    "An account with this email already exists".into(),
                ));
            }
        }
        let profile = account.profile;

        let shop = match shop_details {
            Some(details) => {
                let created = self
                    .shops
                    .create_shop(
                        &profile.id,
                        &details.name,
                        &profile.phone,
                        details.location.as_deref(),
                    )
                    .await;
                match created {
                    Ok(shop) => Some(shop),
                    Err(err) => {
                        // A barber account without a shop is unusable; free the email.
                        warn!(user_id = %profile.id, error = %err, "shop creation failed, removing account");
                        with_retry(&self.retry, || self.accounts.delete_account(&profile.id))
                            .await?;
                        return Err(err);
                    }
                }
            }
            None => None,
        };

        info!(user_id = %profile.id, role = %profile.role, "account created");
        Ok(SignUpOutcome {
            profile,
            shop,
            verification_token,
        })
    }

    /// Confirm the email address. Repeating a successful verification is a no-op.
    pub async fn verify_email(&self, user_id: &str, token: &str) -> Result<(), BarberError> {
        let verified = with_retry(&self.retry, || {
            self.accounts.mark_email_verified(user_id, token)
        })
        .await?;
        if verified {
            info!(user_id, "email verified");
            return Ok(());
        }

        match with_retry(&self.retry, || self.accounts.profile(user_id)).await? {
            Some(profile) if profile.email_verified => Ok(()),
            Some(_) => Err(BarberError::Validation(
                "Invalid or expired verification link".into(),
            )),
            None => Err(BarberError::NotFound {
                entity: "user",
                id: user_id.to_string(),
            }),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, BarberError> {
        let email = email.trim().to_lowercase();
        let Some(account) =
            with_retry(&self.retry, || self.accounts.account_by_email(&email)).await?
        else {
            debug!("sign-in for unknown email");
            return Err(BarberError::Unauthorized(INVALID_CREDENTIALS.into()));
        };

        let attempt = password.expose_secret().to_string();
        let stored = account.password_hash.clone();
        if !blocking(move || verify_password(&attempt, &stored)).await? {
            debug!(user_id = %account.profile.id, "sign-in with wrong password");
            return Err(BarberError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
        if self.require_verified_email && !account.profile.email_verified {
            return Err(BarberError::Unauthorized(
                "Please verify your email before signing in".into(),
            ));
        }

        let token = new_session_token()?;
        let now = self.clock.now();
        let record = SessionRecord {
            token_hash: token_hash(&token),
            user_id: account.profile.id.clone(),
            role: account.profile.role,
            created_at: now,
            expires_at: now + self.session_ttl,
        };
        with_retry(&self.retry, || self.accounts.insert_session(&record)).await?;

        info!(user_id = %record.user_id, "signed in");
        Ok(Session::new(
            record.user_id,
            account.profile.email,
            record.role,
            record.expires_at,
            SecretString::from(token),
        ))
    }

    /// Restore a session from its bearer token.
    ///
    /// An expired session is deleted and reported as unauthorized, which
    /// signs the user out.
    pub async fn resume(&self, token: &SecretString) -> Result<Session, BarberError> {
        let hash = token_hash(token.expose_secret());
        let Some(record) =
            with_retry(&self.retry, || self.accounts.session_by_token_hash(&hash)).await?
        else {
            return Err(BarberError::Unauthorized(SESSION_EXPIRED.into()));
        };

        if self.clock.now() >= record.expires_at {
            warn!(user_id = %record.user_id, "session expired, signing out");
            with_retry(&self.retry, || self.accounts.delete_session(&hash)).await?;
            return Err(BarberError::Unauthorized(SESSION_EXPIRED.into()));
        }

        let email = with_retry(&self.retry, || self.accounts.profile(&record.user_id))
            .await?
            .map(|profile| profile.email)
            .ok_or_else(|| BarberError::Unauthorized(SESSION_EXPIRED.into()))?;

        Ok(Session::new(
            record.user_id,
            email,
            record.role,
            record.expires_at,
            SecretString::from(token.expose_secret().to_string()),
        ))
    }

    pub async fn sign_out(&self, session: Session) -> Result<(), BarberError> {
        let hash = session.token_hash();
        with_retry(&self.retry, || self.accounts.delete_session(&hash)).await?;
        info!(user_id = %session.user_id, "signed out");
        Ok(())
    }

    pub async fn profile(&self, session: &Session) -> Result<UserProfile, BarberError> {
        with_retry(&self.retry, || self.accounts.profile(&session.user_id))
            .await?
            .ok_or_else(|| BarberError::NotFound {
                entity: "user",
                id: session.user_id.clone(),
            })
    }
}
