//! Google service-account OAuth2 token source.
//!
//! Mints an RS256 JWT from the service-account key and exchanges it for an
//! access token at the OAuth2 token endpoint. Tokens are cached until close
//! to expiry and shared by the storage and Document AI clients.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tracing::debug;

const CLOUD_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Clone, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: u64,
}

/// Bearer-token provider backed by a service-account key file.
#[derive(Clone)]
pub struct TokenSource {
    sa_key: ServiceAccountKey,
    cache: Arc<Mutex<Option<CachedToken>>>,
}

impl TokenSource {
    /// Load the service-account key from `key_path`.
    pub fn from_key_file(key_path: &str) -> Result<Self> {
        let key_json = std::fs::read_to_string(key_path)
            .with_context(|| format!("Failed to read service account key: {}", key_path))?;
        let sa_key: ServiceAccountKey = serde_json::from_str(&key_json)
            .context("Failed to parse service account key JSON")?;

        Ok(Self {
            sa_key,
            cache: Arc::new(Mutex::new(None)),
        })
    }

    /// Get a valid access token, refreshing if expired.
    pub async fn access_token(&self, client: &reqwest::Client) -> Result<String> {
        // Check cache, with a 60s safety margin
        {
            let cache = self.cache.lock().unwrap();
            if let Some(ref cached) = *cache {
                if now_secs() < cached.expires_at.saturating_sub(60) {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        // Mint a new JWT
        let now = now_secs();
        let claims = serde_json::json!({
            "iss": self.sa_key.client_email,
            "scope": CLOUD_SCOPE,
            "aud": TOKEN_URI,
            "iat": now,
            "exp": now + 3600,
        });

        let header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256);
        let encoding_key =
            jsonwebtoken::EncodingKey::from_rsa_pem(self.sa_key.private_key.as_bytes())
                .context("Invalid RSA private key in service account JSON")?;

        let jwt = jsonwebtoken::encode(&header, &claims, &encoding_key)
            .context("Failed to encode JWT")?;

        // Exchange JWT for access token
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            expires_in: u64,
        }

        let resp: TokenResponse = client
            .post(TOKEN_URI)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", &jwt),
            ])
            .send()
            .await
            .context("Token exchange request failed")?
            .error_for_status()
            .context("Token exchange returned error")?
            .json()
            .await
            .context("Failed to parse token response")?;

        debug!("Minted access token for {}", self.sa_key.client_email);

        let token = resp.access_token.clone();
        {
            let mut cache = self.cache.lock().unwrap();
            *cache = Some(CachedToken {
                access_token: resp.access_token,
                expires_at: now + resp.expires_in,
            });
        }

        Ok(token)
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}
