use std::sync::Arc;

use uuid::Uuid;

use super::USER;
use crate::domain::{User, normalize_email, validate_password_strength, validate_username};
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

/// Input for [`AuthUseCases::register`].
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// A freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

/// Registration, login and account operations.
#[derive(Clone)]
pub struct AuthUseCases {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthUseCases {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub async fn register(&self, input: RegisterUser) -> Result<User, DomainError> {
        validate_password_strength(&input.password)?;
        let username = validate_username(&input.username)?;
        let email = normalize_email(&input.email)?;

        if self.users.exists_by_username(&username).await? {
            return Err(DomainError::Conflict(format!(
                "User with username '{username}' already exists"
            )));
        }
        if self.users.exists_by_email(&email).await? {
            return Err(DomainError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = self.passwords.hash(&input.password).map_err(internal)?;
        let user = User::new(&username, &email, password_hash, input.full_name)?;

        // A concurrent registration can still win the race; the unique index reports it.
        let stored = self.users.add(user).await.map_err(|e| match e {
            RepoError::Constraint(_) => {
                DomainError::Conflict("Username or email already registered".to_string())
            }
            other => other.into(),
        })?;

        tracing::info!(user_id = %stored.id, "User registered");
        Ok(stored)
    }

    /// Look the user up by username, then by email, and check the password.
    pub async fn authenticate(
        &self,
        username_or_email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        let identifier = username_or_email.trim();
        let user = match self.users.find_by_username(identifier).await? {
            Some(user) => Some(user),
            None => self.users.find_by_email(&identifier.to_lowercase()).await?,
        };

        let Some(user) = user.filter(|u| u.is_active) else {
            return Err(DomainError::Unauthorized);
        };

        if !self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(internal)?
        {
            return Err(DomainError::Unauthorized);
        }

        Ok(user)
    }

    pub fn issue_token(&self, user: User) -> Result<IssuedToken, DomainError> {
        let mut roles = vec!["user".to_string()];
        if user.is_superuser {
            roles.push("admin".to_string());
        }

        let access_token = self
            .tokens
            .generate_token(user.id, &user.username, &user.email, roles)
            .map_err(internal)?;

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer",
            expires_in: self.tokens.expiration_seconds(),
            user,
        })
    }

    /// Resolve a bearer token to an active user. An expired token is reported
    /// as `TokenExpired`, every other token problem as `Unauthorized`.
    pub async fn current_user(&self, token: &str) -> Result<User, DomainError> {
        let claims = self.tokens.validate_token(token).map_err(|e| match e {
            AuthError::TokenExpired => DomainError::TokenExpired,
            _ => DomainError::Unauthorized,
        })?;

        self.active_user(claims.user_id).await
    }

    pub async fn active_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        match self.users.get_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(DomainError::Unauthorized),
        }
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let mut user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(USER, user_id))?;

        if !self
            .passwords
            .verify(current_password, &user.password_hash)
            .map_err(internal)?
        {
            return Err(DomainError::validation("Current password is incorrect"));
        }

        validate_password_strength(new_password)?;

        if self
            .passwords
            .verify(new_password, &user.password_hash)
            .map_err(internal)?
        {
            return Err(DomainError::validation(
                "New password must be different from current password",
            ));
        }

        let new_hash = self.passwords.hash(new_password).map_err(internal)?;
        user.set_password_hash(new_hash)?;

        self.users
            .update(user)
            .await
            .map_err(|e| DomainError::from_repo(e, USER, user_id))?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}

fn internal(err: AuthError) -> DomainError {
    DomainError::Internal(err.to_string())
}
