use serde::Serialize;
use std::sync::Arc;

use crate::auth::{password, TokenError, TokenService};
use crate::database::models::user::{Credentials, NewUser, PublicUser, Registration};
use crate::database::{StoreError, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token error: {0}")]
    Token(#[from] TokenError),
    #[error("hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Successful registration or login: public user fields plus a fresh
/// token. The password hash is not part of this type at all.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: PublicUser,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Register a new user and issue a token.
    pub async fn register(&self, reg: Registration) -> Result<AuthResponse, AuthError> {
        if self.users.user_by_email(&reg.email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = password::hash(&reg.password)?;
        let user = self
            .users
            .insert_user(NewUser {
                name: reg.name,
                email: reg.email,
                password_hash,
                role: reg.role,
            })
            .await
            .map_err(|e| match e {
                // Lost the race against a concurrent registration
                StoreError::Duplicate(_) => AuthError::DuplicateEmail,
                other => AuthError::Store(other),
            })?;

        let token = self.tokens.issue(user.id)?;
        Ok(AuthResponse {
            user: PublicUser::from(&user),
            token,
        })
    }

    /// Authenticate by email and password.
    ///
    /// An unknown email and a wrong password both collapse into the one
    /// `InvalidCredentials` value, so the two cases are indistinguishable
    /// to the caller.
    pub async fn login(&self, creds: Credentials) -> Result<AuthResponse, AuthError> {
        let user = self
            .users
            .user_by_email(&creds.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify(&creds.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        Ok(AuthResponse {
            user: PublicUser::from(&user),
            token,
        })
    }
}
