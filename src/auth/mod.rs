use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config;
use crate::database::models::Staff;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Staff member id inside their school's database
    pub sub: Uuid,
    /// School slug the token was issued for
    pub school: String,
    pub name: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(staff: &Staff, school_slug: &str) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: staff.id,
            school: school_slug.to_string(),
            name: staff.name.clone(),
            role: staff.role.clone(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}

/// Password digest stored on the staff row. Salted with the login email so
/// equal passwords across accounts digest differently.
pub fn password_digest(email: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_password(staff: &Staff, password: &str) -> bool {
    password_digest(&staff.email, password) == staff.password_digest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_row(email: &str, password: &str) -> Staff {
        Staff {
            id: Uuid::new_v4(),
            name: "Asha Verma".to_string(),
            email: email.to_string(),
            password_digest: password_digest(email, password),
            role: "teacher".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn digest_is_deterministic_and_salted_by_email() {
        let a = password_digest("a@school.example", "secret");
        let b = password_digest("a@school.example", "secret");
        let c = password_digest("b@school.example", "secret");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn verifies_matching_password_only() {
        let staff = staff_row("a@school.example", "secret");
        assert!(verify_password(&staff, "secret"));
        assert!(!verify_password(&staff, "wrong"));
    }

    #[test]
    fn jwt_round_trip_preserves_claims() {
        // Development profile config carries a usable secret
        let staff = staff_row("a@school.example", "secret");
        let claims = Claims::new(&staff, "aspire-intl");

        let token = generate_jwt(&claims).expect("token");
        let decoded = validate_jwt(&token).expect("claims");

        assert_eq!(decoded.sub, staff.id);
        assert_eq!(decoded.school, "aspire-intl");
        assert_eq!(decoded.role, "teacher");
    }
}
