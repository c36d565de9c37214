use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims minted by the auth service at login.
///
/// `sub` is the actor's UUID in the `vendors` or `societies` table; `role`
/// decides which. Tokens are signed HS256 with the shared `JWT_SECRET`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Vendor or society UUID.
    pub sub: String,
    /// One of "vendor", "society", "admin".
    pub role: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: Option<usize>,
}

impl Claims {
    /// Extract the actor UUID from the `sub` claim.
    pub fn actor_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }
}

/// Validate an HS256 JWT against the shared secret and return its claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Token validation failed: {e:?}"))
}
