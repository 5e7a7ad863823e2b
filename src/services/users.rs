//! Authentication, registration and account approval

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    domain::lifecycle::{check_access_grant, ApprovalAction, ApprovalState},
    error::{AppError, AppResult},
    models::{
        enums::{AssetType, RecordStatus},
        user::{LoginResponse, RegisterUser, Role, User, UserClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and password and issue a JWT
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self
            .repository
            .users
            .get_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        match user.status {
            RecordStatus::Approved => {}
            RecordStatus::Pending => {
                return Err(AppError::Authentication("Account is awaiting approval".to_string()))
            }
            RecordStatus::Rejected => {
                return Err(AppError::Authentication("Account registration was rejected".to_string()))
            }
        }

        let now = Utc::now().timestamp();
        let expires_in = self.config.jwt_expiration_hours as i64 * 3600;
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            access: user.access.clone(),
            exp: now + expires_in,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(username = %user.username, role = %user.role, "user logged in");

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        })
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Self-registration; the account waits for an administrator's approval
    pub async fn register(&self, data: &RegisterUser) -> AppResult<User> {
        if data.role == Role::Admin {
            return Err(AppError::Validation(
                "Administrator accounts cannot be self-registered".to_string(),
            ));
        }
        let username = data.username.trim();
        if self.repository.users.username_exists(username).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let hash = self.hash_password(&data.password)?;
        let user = self
            .repository
            .users
            .create(username, &hash, data.role, RecordStatus::Pending, &[])
            .await?;

        tracing::info!(username = %user.username, role = %user.role, "registration received");
        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn registrations(&self) -> AppResult<Vec<User>> {
        self.repository.users.list_by_status(RecordStatus::Pending).await
    }

    /// Approve a registration; asset roles must be granted at least one asset type
    pub async fn approve(&self, id: i64, access: &[AssetType]) -> AppResult<User> {
        let user = self.repository.users.get_by_id(id).await?;
        let next = ApprovalState::from_parts(user.status, user.remark.as_deref())
            .apply(ApprovalAction::Approve)?;
        check_access_grant(user.role, access)?;

        let mut access = access.to_vec();
        access.sort();
        access.dedup();

        let user = self
            .repository
            .users
            .set_status(id, next.status(), None, &access)
            .await?;
        tracing::info!(username = %user.username, access = ?user.access, "registration approved");
        Ok(user)
    }

    pub async fn reject(&self, id: i64, remark: &str) -> AppResult<User> {
        let user = self.repository.users.get_by_id(id).await?;
        let next = ApprovalState::from_parts(user.status, user.remark.as_deref()).apply(
            ApprovalAction::Reject {
                remark: remark.to_string(),
            },
        )?;

        let user = self
            .repository
            .users
            .set_status(id, next.status(), next.remark(), &[])
            .await?;
        tracing::info!(username = %user.username, "registration rejected");
        Ok(user)
    }

    /// Create the bootstrap administrator when a password is configured
    pub async fn ensure_admin(&self) -> AppResult<()> {
        let Some(ref password) = self.config.admin_password else {
            return Ok(());
        };
        let username = self.config.admin_username.trim();
        match self.repository.users.get_by_username(username).await? {
            Some(existing) if existing.role == Role::Admin => {}
            Some(_) => {
                tracing::warn!(username, "configured administrator name belongs to a non-admin account");
            }
            None => {
                let hash = self.hash_password(password)?;
                self.repository
                    .users
                    .create(
                        username,
                        &hash,
                        Role::Admin,
                        RecordStatus::Approved,
                        &[AssetType::Permanent, AssetType::Consumable],
                    )
                    .await?;
                tracing::info!(username, "administrator account created");
            }
        }
        Ok(())
    }
}
