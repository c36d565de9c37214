///! Integration test for JWT auth validation.
///!
///! Mints JWTs locally with the same HS256 secret the server would use and
///! validates them through `validate_token`. No running server or database
///! is needed.
///!
///! Run with: `cargo test --test auth_test`
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use velre_backend::auth::jwt::{Claims, validate_token};

/// A fake secret for testing — never use the real one in tests committed to git.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

/// Helper: mint a JWT signed with HS256 using the test secret.
fn mint_test_token(sub: &str, role: &str) -> String {
    let now = Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: sub.to_string(),
        role: role.to_string(),
        exp: now + 3600, // 1 hour from now
        iat: Some(now),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

#[test]
fn test_vendor_token_decodes_correctly() {
    let vendor_id = Uuid::new_v4();
    let token = mint_test_token(&vendor_id.to_string(), "vendor");

    let claims = validate_token(&token, TEST_SECRET).expect("Token should be valid");

    assert_eq!(claims.role, "vendor");
    assert_eq!(claims.actor_id().unwrap(), vendor_id);
}

#[test]
fn test_society_and_admin_roles_round_trip() {
    for role in ["society", "admin"] {
        let token = mint_test_token(&Uuid::new_v4().to_string(), role);
        let claims = validate_token(&token, TEST_SECRET).unwrap();
        assert_eq!(claims.role, role);
    }
}

#[test]
fn test_expired_token_is_rejected() {
    let now = Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        role: "vendor".to_string(),
        exp: now - 300, // expired 5 minutes ago (well past the 60s default leeway)
        iat: Some(now - 3600),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let result = validate_token(&token, TEST_SECRET);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("ExpiredSignature"));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let token = mint_test_token(&Uuid::new_v4().to_string(), "vendor");

    let result = validate_token(&token, "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("InvalidSignature"));
}

#[test]
fn test_garbage_token_is_rejected() {
    let result = validate_token("not.a.valid.jwt", TEST_SECRET);
    assert!(result.is_err());
}

#[test]
fn test_non_uuid_sub_is_caught_by_actor_id() {
    let token = mint_test_token("not-a-uuid", "vendor");
    let claims = validate_token(&token, TEST_SECRET).unwrap();
    assert!(claims.actor_id().is_err());
}
