//! User model, roles and JWT claims

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{AssetType, RecordStatus};
use crate::error::AppError;

/// Roles of the institution's staff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    /// Records asset purchases, issues, returns, servicing and disposal
    AssetEntry,
    /// Approves or rejects asset records
    AssetManager,
    FacultyEntry,
    FacultyVerifier,
    Principal,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::AssetEntry => "assetentry",
            Role::AssetManager => "assetmanager",
            Role::FacultyEntry => "facultyentry",
            Role::FacultyVerifier => "facultyverifier",
            Role::Principal => "principal",
            Role::Viewer => "viewer",
        }
    }

    /// Roles whose work is scoped by an asset-type access grant
    pub fn needs_asset_access(&self) -> bool {
        matches!(self, Role::AssetEntry | Role::AssetManager)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "assetentry" => Ok(Role::AssetEntry),
            "assetmanager" => Ok(Role::AssetManager),
            "facultyentry" => Ok(Role::FacultyEntry),
            "facultyverifier" => Ok(Role::FacultyVerifier),
            "principal" => Ok(Role::Principal),
            "viewer" => Ok(Role::Viewer),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Internal row structure for user queries
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub access: Vec<String>,
    pub status: String,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User account
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub access: Vec<AssetType>,
    pub status: RecordStatus,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let access = row
            .access
            .iter()
            .map(|a| a.parse::<AssetType>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::Internal)?;
        Ok(User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            role: row.role.parse().map_err(AppError::Internal)?,
            access,
            status: row.status.parse().map_err(AppError::Internal)?,
            remark: row.remark,
            created_at: row.created_at,
        })
    }
}

static USERNAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid username pattern"));

/// Self-registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(
        length(min = 3, message = "Username must be at least 3 characters"),
        regex(path = *USERNAME, message = "Username may only contain letters, digits, '.', '_' and '-'")
    )]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Role,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response carrying the bearer token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Capability grant given when approving a registration
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApproveUser {
    #[serde(default)]
    pub access: Vec<AssetType>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i64,
    pub role: Role,
    pub access: Vec<AssetType>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    fn require_role(&self, roles: &[Role], what: &str) -> Result<(), AppError> {
        if self.is_admin() || roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!("Insufficient rights to {}", what)))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        self.require_role(&[], "manage users")
    }

    pub fn require_asset_entry(&self) -> Result<(), AppError> {
        self.require_role(&[Role::AssetEntry], "record assets")
    }

    pub fn require_asset_approval(&self) -> Result<(), AppError> {
        self.require_role(&[Role::AssetManager], "approve asset records")
    }

    pub fn require_asset_reports(&self) -> Result<(), AppError> {
        self.require_role(
            &[Role::AssetEntry, Role::AssetManager, Role::Principal, Role::Viewer],
            "view asset reports",
        )
    }

    pub fn require_faculty_entry(&self) -> Result<(), AppError> {
        self.require_role(&[Role::FacultyEntry], "record faculty")
    }

    pub fn require_faculty_approval(&self) -> Result<(), AppError> {
        self.require_role(&[Role::FacultyVerifier], "approve faculty records")
    }

    pub fn require_faculty_view(&self) -> Result<(), AppError> {
        self.require_role(
            &[Role::FacultyEntry, Role::FacultyVerifier, Role::Principal, Role::Viewer],
            "view faculty records",
        )
    }

    /// Asset types a listing is restricted to: the requested one, or every
    /// granted type for asset roles. `None` means unrestricted.
    pub fn asset_scope(&self, requested: Option<AssetType>) -> Result<Option<Vec<AssetType>>, AppError> {
        match requested {
            Some(t) => {
                self.require_asset_type(t)?;
                Ok(Some(vec![t]))
            }
            None if self.role.needs_asset_access() && !self.is_admin() => Ok(Some(self.access.clone())),
            None => Ok(None),
        }
    }

    /// Asset roles may only touch asset types they were granted
    pub fn require_asset_type(&self, asset_type: AssetType) -> Result<(), AppError> {
        if !self.role.needs_asset_access() || self.is_admin() || self.access.contains(&asset_type) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "No access granted to {} assets",
                asset_type
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role, access: Vec<AssetType>) -> UserClaims {
        UserClaims {
            sub: "staff".to_string(),
            user_id: 7,
            role,
            access,
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let c = claims(Role::AssetEntry, vec![AssetType::Permanent]);
        let token = c.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.sub, "staff");
        assert_eq!(parsed.role, Role::AssetEntry);
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_role_checks() {
        let entry = claims(Role::AssetEntry, vec![AssetType::Consumable]);
        assert!(entry.require_asset_entry().is_ok());
        assert!(entry.require_asset_approval().is_err());
        assert!(entry.require_asset_type(AssetType::Consumable).is_ok());
        assert!(entry.require_asset_type(AssetType::Permanent).is_err());

        let admin = claims(Role::Admin, vec![]);
        assert!(admin.require_asset_approval().is_ok());
        assert!(admin.require_asset_type(AssetType::Permanent).is_ok());

        let principal = claims(Role::Principal, vec![]);
        assert!(principal.require_asset_reports().is_ok());
        assert!(principal.require_asset_entry().is_err());
    }

    #[test]
    fn test_register_username_rules() {
        let register = |username: &str| RegisterUser {
            username: username.to_string(),
            password: "secret123".to_string(),
            role: Role::Viewer,
        };
        assert!(register("store.keeper").validate().is_ok());
        assert!(register("ab").validate().is_err());
        assert!(register("store keeper").validate().is_err());
        assert!(register(".hidden").validate().is_err());
    }

    #[test]
    fn test_asset_scope() {
        let manager = claims(Role::AssetManager, vec![AssetType::Permanent]);
        assert_eq!(manager.asset_scope(None).unwrap(), Some(vec![AssetType::Permanent]));
        assert!(manager.asset_scope(Some(AssetType::Consumable)).is_err());

        let admin = claims(Role::Admin, vec![]);
        assert_eq!(admin.asset_scope(None).unwrap(), None);
        assert_eq!(
            admin.asset_scope(Some(AssetType::Consumable)).unwrap(),
            Some(vec![AssetType::Consumable])
        );
    }
}
