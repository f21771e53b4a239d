//! User service implementation
//!
//! Sign-up, sign-in, current-user lookup and account deletion. The
//! provider account and the local row are created together; the local row
//! is the durable record, the provider owns credentials and verification.

use regex::Regex;
use tracing::{debug, info};

use crate::database::repositories::UserRepository;
use crate::models::user::{CreateUserRequest, User, UserRole};
use crate::services::auth::Principal;
use crate::services::identity::{IdentityAccount, IdentityService};
use crate::utils::errors::{IdentityError, PlanMeError, Result};

const MAX_USER_NAME_LEN: usize = 30;

/// A successful sign-in: the provider session plus the local row
#[derive(Debug, Clone)]
pub struct SignIn {
    pub account: IdentityAccount,
    pub user: User,
}

/// User service for account lifecycle operations
#[derive(Debug, Clone)]
pub struct UserService {
    user_repository: UserRepository,
    identity: IdentityService,
    email_pattern: Regex,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(user_repository: UserRepository, identity: IdentityService) -> Self {
        // Unwrap is fine: the pattern is a compile-time constant.
        let email_pattern = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
        Self {
            user_repository,
            identity,
            email_pattern,
        }
    }

    /// Sign up a new user: provider account, verification email, local row
    pub async fn sign_up(
        &self,
        user_name: &str,
        user_email: &str,
        password: &str,
        user_role: &str,
    ) -> Result<User> {
        if user_name.is_empty() || user_email.is_empty() || password.is_empty() || user_role.is_empty()
        {
            return Err(PlanMeError::Validation(
                "Looks like some details are missing".to_string(),
            ));
        }

        if !self.email_pattern.is_match(user_email) {
            return Err(PlanMeError::Validation("Invalid email address".to_string()));
        }

        if user_name.len() > MAX_USER_NAME_LEN {
            return Err(PlanMeError::Validation(format!(
                "User name must be between 1 and {} characters",
                MAX_USER_NAME_LEN
            )));
        }

        let role = UserRole::parse(user_role).ok_or_else(|| {
            PlanMeError::Validation(format!("Unknown user role: {}", user_role))
        })?;

        let account = self.identity.sign_up(user_email, password).await?;
        // The user cannot proceed until the email is verified; the provider
        // session created by sign-up is discarded.
        self.identity
            .send_email_verification(&account.id_token)
            .await?;

        let user = self
            .user_repository
            .create(CreateUserRequest {
                firebase_uid: account.local_id.clone(),
                user_name: user_name.to_string(),
                user_email: user_email.to_string(),
                user_role: role.as_str().to_string(),
            })
            .await?;

        info!(user_id = user.user_id, uid = %account.local_id, "User signed up, verification email sent");
        Ok(user)
    }

    /// Sign in an existing user. Unverified emails are rejected.
    pub async fn sign_in(&self, user_email: &str, password: &str) -> Result<SignIn> {
        if !self.email_pattern.is_match(user_email) {
            return Err(PlanMeError::Validation("Invalid email address".to_string()));
        }

        let account = self.identity.sign_in(user_email, password).await?;

        if !self.identity.is_email_verified(&account.id_token).await? {
            return Err(PlanMeError::Identity(IdentityError::EmailNotVerified));
        }

        let user = self
            .user_repository
            .find_by_firebase_uid(&account.local_id)
            .await?
            .ok_or_else(|| PlanMeError::UserNotFound {
                uid: account.local_id.clone(),
            })?;

        info!(user_id = user.user_id, "User signed in");
        Ok(SignIn { account, user })
    }

    /// Resolve the caller's local user row
    pub async fn current_user(&self, principal: &Principal) -> Result<User> {
        debug!(uid = %principal.uid(), "Resolving current user");

        self.user_repository
            .find_by_firebase_uid(principal.uid())
            .await?
            .ok_or_else(|| PlanMeError::UserNotFound {
                uid: principal.uid().to_string(),
            })
    }

    /// Delete the caller's account: provider account first, then the local
    /// row. Local deletion cascades to owned events and attendances.
    pub async fn delete_user(&self, principal: &Principal, id_token: &str) -> Result<()> {
        let user = self.current_user(principal).await?;

        self.identity.delete_account(id_token).await?;
        self.user_repository
            .delete_by_firebase_uid(principal.uid())
            .await?;

        info!(user_id = user.user_id, "User account deleted");
        Ok(())
    }
}
