//! Google ID-token verification against Google's published signing keys

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::identity::{IdentityError, IdentityVerifier, VerifiedIdentity};

/// Google's JWKS endpoint
pub const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Issuers Google uses for ID tokens
pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Key cache lifetime when the response carries no `max-age`
const DEFAULT_KEY_TTL: Duration = Duration::from_secs(60 * 60);

/// Claims of a Google ID token that the portal uses
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

impl TryFrom<GoogleClaims> for VerifiedIdentity {
    type Error = IdentityError;

    fn try_from(claims: GoogleClaims) -> Result<Self, Self::Error> {
        let email = claims
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or(IdentityError::MissingEmail)?;

        Ok(VerifiedIdentity {
            subject: claims.sub,
            email,
            name: claims.name,
            picture: claims.picture,
        })
    }
}

struct CachedKeys {
    keys: JwkSet,
    expires_at: Instant,
}

/// Verifies Google ID tokens issued for a specific OAuth client id
pub struct GoogleIdTokenVerifier {
    client_id: String,
    certs_url: String,
    http: reqwest::Client,
    cache: RwLock<Option<CachedKeys>>,
}

impl GoogleIdTokenVerifier {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            certs_url: GOOGLE_CERTS_URL.to_string(),
            http: reqwest::Client::new(),
            cache: RwLock::new(None),
        }
    }

    /// Override the JWKS endpoint
    pub fn with_certs_url(mut self, url: impl Into<String>) -> Self {
        self.certs_url = url.into();
        self
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.client_id.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS[..]);
        validation
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, IdentityError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.expires_at > Instant::now() {
                    if let Some(jwk) = cached.keys.find(kid) {
                        return Ok(DecodingKey::from_jwk(jwk)?);
                    }
                }
            }
        }

        // Stale cache or a rotated key: refetch once.
        let (keys, ttl) = self.fetch_keys().await?;
        let key = keys
            .find(kid)
            .map(DecodingKey::from_jwk)
            .transpose()?
            .ok_or_else(|| IdentityError::UnknownKey(kid.to_string()))?;

        *self.cache.write().await = Some(CachedKeys {
            keys,
            expires_at: Instant::now() + ttl,
        });

        Ok(key)
    }

    async fn fetch_keys(&self) -> Result<(JwkSet, Duration), IdentityError> {
        debug!("Fetching identity provider keys from {}", self.certs_url);

        let response = self
            .http
            .get(&self.certs_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| IdentityError::KeyFetch(e.to_string()))?;

        let ttl = response
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age)
            .unwrap_or(DEFAULT_KEY_TTL);

        let keys: JwkSet = response
            .json()
            .await
            .map_err(|e| IdentityError::KeyFetch(e.to_string()))?;

        info!(
            "Loaded {} identity provider keys (cached for {}s)",
            keys.keys.len(),
            ttl.as_secs()
        );

        Ok((keys, ttl))
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdTokenVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, IdentityError> {
        let header =
            decode_header(credential).map_err(|e| IdentityError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| IdentityError::InvalidToken("missing key id".to_string()))?;

        let key = self.decoding_key(&kid).await?;
        let token_data = decode::<GoogleClaims>(credential, &key, &self.validation())?;

        token_data.claims.try_into()
    }
}

/// Extract `max-age` seconds from a Cache-Control header value
fn parse_max_age(value: &str) -> Option<Duration> {
    value
        .split(',')
        .map(str::trim)
        .find_map(|directive| directive.strip_prefix("max-age="))
        .and_then(|secs| secs.parse::<u64>().ok())
        .map(Duration::from_secs)
}
