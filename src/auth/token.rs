//! Session token issuing and verification.
//!
//! Tokens are HS256 JWTs signed with the configured secret. On the wire the payload
//! is flat:
//!
//! ```json
//! { "sub": "12", "username": "barista", "kind": "shop_admin", "shop_id": 7, "iat": 1700000000, "exp": 1700086400 }
//! ```
//!
//! Inside the service it becomes [`Claims`], where the shop binding only exists on
//! the shop-admin variant. A payload whose `shop_id` disagrees with its `kind` is
//! rejected even if the signature is good.
//!
//! There is no revocation list; a leaked token stays valid until `exp`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::auth::principal::{Principal, PrincipalKind};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Encode(jsonwebtoken::errors::Error),

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("invalid claim '{0}'")]
    InvalidClaim(&'static str),

    #[error("token lifetime overflows the calendar")]
    ExpiryOutOfRange,
}

/// Longest session token lifetime accepted from configuration (one year).
pub const MAX_EXPIRE_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainAdminClaims {
    pub principal_id: i64,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopAdminClaims {
    pub principal_id: i64,
    pub username: String,
    pub shop_id: i64,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Verified identity and scope carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claims {
    MainAdmin(MainAdminClaims),
    ShopAdmin(ShopAdminClaims),
}

impl Claims {
    /// Build claims for `principal`, valid from `now` (truncated to whole seconds) for `ttl`.
    pub fn for_principal(
        principal: &Principal,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let issued_at = whole_seconds(now);
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let principal_id = principal.id();
        let username = principal.username().to_string();

        let claims = match principal.shop_id() {
            None => Claims::MainAdmin(MainAdminClaims {
                principal_id,
                username,
                issued_at,
                expires_at,
            }),
            Some(shop_id) => Claims::ShopAdmin(ShopAdminClaims {
                principal_id,
                username,
                shop_id,
                issued_at,
                expires_at,
            }),
        };
        Ok(claims)
    }

    pub fn principal_id(&self) -> i64 {
        match self {
            Claims::MainAdmin(c) => c.principal_id,
            Claims::ShopAdmin(c) => c.principal_id,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Claims::MainAdmin(c) => &c.username,
            Claims::ShopAdmin(c) => &c.username,
        }
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Claims::MainAdmin(_) => PrincipalKind::MainAdmin,
            Claims::ShopAdmin(_) => PrincipalKind::ShopAdmin,
        }
    }

    pub fn shop_id(&self) -> Option<i64> {
        match self {
            Claims::MainAdmin(_) => None,
            Claims::ShopAdmin(c) => Some(c.shop_id),
        }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        match self {
            Claims::MainAdmin(c) => c.issued_at,
            Claims::ShopAdmin(c) => c.issued_at,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        match self {
            Claims::MainAdmin(c) => c.expires_at,
            Claims::ShopAdmin(c) => c.expires_at,
        }
    }
}

/// Wire representation of [`Claims`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenPayload {
    sub: String,
    username: String,
    kind: PrincipalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shop_id: Option<i64>,
    iat: i64,
    exp: i64,
}

impl From<&Claims> for TokenPayload {
    fn from(claims: &Claims) -> Self {
        Self {
            sub: claims.principal_id().to_string(),
            username: claims.username().to_string(),
            kind: claims.kind(),
            shop_id: claims.shop_id(),
            iat: claims.issued_at().timestamp(),
            exp: claims.expires_at().timestamp(),
        }
    }
}

impl TryFrom<TokenPayload> for Claims {
    type Error = TokenError;

    fn try_from(payload: TokenPayload) -> Result<Self, TokenError> {
        let principal_id = payload
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::InvalidClaim("sub"))?;
        let issued_at = timestamp(payload.iat).ok_or(TokenError::InvalidClaim("iat"))?;
        let expires_at = timestamp(payload.exp).ok_or(TokenError::InvalidClaim("exp"))?;

        match (payload.kind, payload.shop_id) {
            (PrincipalKind::MainAdmin, None) => Ok(Claims::MainAdmin(MainAdminClaims {
                principal_id,
                username: payload.username,
                issued_at,
                expires_at,
            })),
            (PrincipalKind::ShopAdmin, Some(shop_id)) => Ok(Claims::ShopAdmin(ShopAdminClaims {
                principal_id,
                username: payload.username,
                shop_id,
                issued_at,
                expires_at,
            })),
            _ => Err(TokenError::InvalidClaim("shop_id")),
        }
    }
}

fn timestamp(seconds: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0).single()
}

fn whole_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    timestamp(at.timestamp()).unwrap_or(at)
}

/// Issues and verifies session tokens with one symmetric secret.
///
/// Built once at startup from configuration and shared read-only across requests.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// `expire_hours` is clamped to `1..=MAX_EXPIRE_HOURS`; configuration rejects
    /// anything outside that range before it gets here.
    pub fn new(secret: &str, expire_hours: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(expire_hours.clamp(1, MAX_EXPIRE_HOURS)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `principal`, valid from now for the configured lifetime.
    pub fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        self.issue_at(principal, Utc::now())
    }

    pub fn issue_at(&self, principal: &Principal, now: DateTime<Utc>) -> Result<String, TokenError> {
        self.sign(&Claims::for_principal(principal, now, self.ttl)?)
    }

    /// Sign an already-built claim set.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let payload = TokenPayload::from(claims);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(TokenError::Encode)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` as of `now`.
    ///
    /// The signature is checked before anything in the payload is trusted. A token
    /// is expired once `now` reaches its `exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<TokenPayload>(token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed(err.to_string()),
            })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Claims::try_from(data.claims)
    }
}
