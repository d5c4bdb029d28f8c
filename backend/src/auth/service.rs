//! Core business logic for the authentication system.
//!
//! This service handles credential checks, password hashing, session token
//! issuance and validation, and bulk account creation. It orchestrates
//! interactions between handlers and the database.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::errors::AuthError;
use super::models::{Claims, SessionUser, SignupRequest};
use crate::config::BootstrapAccount;
use crate::database::{
    models::{Gender, NewUser, Role, StudentType, User},
    queries,
};
use crate::errors::{ApiError, ApiResult};

/// Signs and validates HS256 session tokens.
#[derive(Clone)]
pub struct SessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionTokens {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::try_seconds(ttl_secs).unwrap_or(Duration::MAX),
        }
    }

    pub fn issue(&self, user: &User) -> Result<(String, DateTime<Utc>), AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::TokenIssue("session lifetime out of range".to_string()))?;
        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            gender: user.gender,
            student_type: user.student_type,
            department: user.department.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;
        Ok((token, expires_at))
    }

    pub fn verify(&self, token: &str) -> Result<SessionUser, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims.into())
    }
}

pub async fn hash_password(password: String, cost: u32) -> ApiResult<String> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await?;
    Ok(hashed.map_err(AuthError::from)?)
}

pub async fn verify_password(password: String, hashed: String) -> ApiResult<bool> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed)).await?;
    Ok(matches.map_err(AuthError::from)?)
}

/// Checks an email/password pair against the stored bcrypt hash.
pub async fn authenticate(pool: &SqlitePool, email: &str, password: &str) -> ApiResult<User> {
    let user = queries::find_user_by_email(pool, email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password.to_string(), user.hashed_password.clone()).await? {
        debug!("Password mismatch for {email}");
        return Err(AuthError::InvalidCredentials.into());
    }

    Ok(user)
}

/// A signup entry whose fields are present and whose enums parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSignup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub gender: Gender,
    pub student_type: StudentType,
    pub department: String,
}

fn required(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validates and normalizes one signup entry. Role and gender are matched
/// case-insensitively; `day-scholar` is accepted for `DAY_SCHOLAR`.
pub fn validate_signup(request: &SignupRequest) -> ApiResult<ValidatedSignup> {
    let missing = || {
        let who = required(&request.email).unwrap_or_else(|| "unknown".to_string());
        ApiError::bad_request(format!("Missing fields for user: {who}"))
    };

    let name = required(&request.name).ok_or_else(missing)?;
    let email = required(&request.email).ok_or_else(missing)?;
    let password = request
        .password
        .clone()
        .filter(|p| !p.is_empty())
        .ok_or_else(missing)?;
    let role = required(&request.role).ok_or_else(missing)?;
    let department = required(&request.department).ok_or_else(missing)?;
    let gender = required(&request.gender).ok_or_else(missing)?;
    let student_type = required(&request.student_type).ok_or_else(missing)?;

    let invalid = |e: crate::database::models::UnknownVariant| {
        ApiError::bad_request(format!("Invalid user {email}: {e}"))
    };

    Ok(ValidatedSignup {
        role: role.parse().map_err(invalid)?,
        gender: gender.parse().map_err(invalid)?,
        student_type: student_type.parse().map_err(invalid)?,
        name,
        email: email.clone(),
        password,
        department,
    })
}

/// Validates every entry, hashes the passwords and inserts the batch.
/// Returns how many accounts were created; existing emails are skipped.
pub async fn register_users(pool: &SqlitePool, requests: &[SignupRequest], cost: u32) -> ApiResult<u64> {
    if requests.is_empty() {
        return Err(ApiError::bad_request("No users provided"));
    }

    let validated = requests
        .iter()
        .map(validate_signup)
        .collect::<ApiResult<Vec<_>>>()?;

    let mut prepared = Vec::with_capacity(validated.len());
    for signup in validated {
        prepared.push(NewUser {
            hashed_password: hash_password(signup.password, cost).await?,
            name: signup.name,
            email: signup.email,
            role: signup.role,
            gender: signup.gender,
            student_type: signup.student_type,
            department: signup.department,
        });
    }

    let count = queries::insert_users(pool, &prepared).await?;
    info!("Registered {count} of {} submitted users", prepared.len());
    Ok(count)
}

/// Creates the configured super-user if no account has its email yet.
pub async fn ensure_bootstrap_account(
    pool: &SqlitePool,
    account: &BootstrapAccount,
    cost: u32,
) -> ApiResult<()> {
    if queries::find_user_by_email(pool, &account.email).await?.is_some() {
        debug!("Bootstrap account {} already present", account.email);
        return Ok(());
    }

    let user = NewUser {
        name: account.name.clone(),
        email: account.email.clone(),
        hashed_password: hash_password(account.password.clone(), cost).await?,
        role: Role::Super,
        gender: Gender::Male,
        student_type: StudentType::DayScholar,
        department: "ADMINISTRATION".to_string(),
    };
    queries::insert_users(pool, &[user]).await?;
    info!("Created bootstrap super-user {}", account.email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "user-1".to_string(),
            name: "Lakshmi".to_string(),
            email: "lakshmi@campus.edu".to_string(),
            hashed_password: String::new(),
            role: Role::Warden,
            gender: Gender::Female,
            student_type: StudentType::Hosteler,
            department: "EEE".to_string(),
            created_at: Utc::now(),
        }
    }

    fn full_request() -> SignupRequest {
        SignupRequest {
            name: Some("Kiran".to_string()),
            email: Some("kiran@campus.edu".to_string()),
            password: Some("pass123".to_string()),
            role: Some("student".to_string()),
            department: Some("CSE".to_string()),
            gender: Some("male".to_string()),
            student_type: Some("day-scholar".to_string()),
        }
    }

    #[test]
    fn test_token_round_trip_carries_session() {
        let tokens = SessionTokens::new("test-secret", 3600);
        let (token, expires_at) = tokens.issue(&sample_user()).unwrap();
        assert!(expires_at > Utc::now());

        let session = tokens.verify(&token).unwrap();
        assert_eq!(session.id, "user-1");
        assert_eq!(session.role, Role::Warden);
        assert_eq!(session.student_type, StudentType::Hosteler);
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let issuer = SessionTokens::new("secret-a", 3600);
        let verifier = SessionTokens::new("secret-b", 3600);
        let (token, _) = issuer.issue(&sample_user()).unwrap();
        assert!(matches!(verifier.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = SessionTokens::new("test-secret", -120);
        let (token, _) = tokens.issue(&sample_user()).unwrap();
        assert!(matches!(tokens.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn test_unrepresentable_lifetime_fails_to_issue() {
        for ttl in [10_000_000_000_000, i64::MAX] {
            let tokens = SessionTokens::new("test-secret", ttl);
            assert!(matches!(tokens.issue(&sample_user()), Err(AuthError::TokenIssue(_))));
        }
    }

    #[test]
    fn test_validate_signup_normalizes_values() {
        let signup = validate_signup(&full_request()).unwrap();
        assert_eq!(signup.role, Role::Student);
        assert_eq!(signup.gender, Gender::Male);
        assert_eq!(signup.student_type, StudentType::DayScholar);
    }

    #[test]
    fn test_validate_signup_reports_missing_field() {
        let request = SignupRequest {
            department: None,
            ..full_request()
        };
        let err = validate_signup(&request).unwrap_err();
        assert_eq!(err.to_string(), "Missing fields for user: kiran@campus.edu");

        let err = validate_signup(&SignupRequest::default()).unwrap_err();
        assert_eq!(err.to_string(), "Missing fields for user: unknown");
    }

    #[test]
    fn test_validate_signup_rejects_unknown_role() {
        let request = SignupRequest {
            role: Some("principal".to_string()),
            ..full_request()
        };
        assert!(matches!(validate_signup(&request), Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_password_hash_and_verify() {
        let hashed = hash_password("hunter2".to_string(), 4).await.unwrap();
        assert!(verify_password("hunter2".to_string(), hashed.clone()).await.unwrap());
        assert!(!verify_password("wrong".to_string(), hashed).await.unwrap());
    }
}
