use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthService;
use crate::database::DatabaseService;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
use crate::utils;
use crate::utils::error::AppError;

/// Registration, login and current-user lookup.
pub struct UserService {
    pub db: Arc<DatabaseService>,
    pub auth: Arc<AuthService>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseService>, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }

    /// Register a new user: unique email, Gravatar-derived avatar, bcrypt
    /// password hash, session token in return. The unique constraint on
    /// `users.email` backs the pre-check, so a duplicate can never create a
    /// second record.
    pub async fn register(&self, req: RegisterRequest) -> Result<TokenResponse, AppError> {
        if self.db.get_user_by_email(&req.email).await?.is_some() {
            return Err(AppError::bad_request("User already exists"));
        }

        let avatar = utils::gravatar::url(&req.email);
        let password_hash = self.auth.hash_password(&req.password)?;

        let user = self
            .db
            .create_user(&req.name, &req.email, &password_hash, &avatar)
            .await?;

        let token = self.auth.generate_token(user.id)?;
        Ok(TokenResponse::new(token))
    }

    /// Authenticate by email/password. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn login(&self, req: LoginRequest) -> Result<TokenResponse, AppError> {
        let user = match self.db.get_user_by_email(&req.email).await? {
            Some(user) => user,
            None => return Err(AppError::bad_request("Wrong Credentials")),
        };

        if !self.auth.verify_password(&req.password, &user.password_hash)? {
            return Err(AppError::bad_request("Wrong Credentials"));
        }

        let token = self.auth.generate_token(user.id)?;
        Ok(TokenResponse::new(token))
    }

    /// The authenticated user's record, sans password hash.
    pub async fn current_user(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        match self.db.get_user_by_id(&user_id).await? {
            Some(user) => Ok(user.into()),
            None => Err(AppError::bad_request("User does not exist")),
        }
    }
}
