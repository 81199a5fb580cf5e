use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::principal::{Principal, Role};

type HmacSha256 = Hmac<Sha256>;

fn mac_over(secret: &[u8], unsigned: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(secret).expect("hmac accepts any key length");
    mac.update(unsigned.as_bytes());
    mac
}

fn sign(secret: &[u8], unsigned: &str) -> String {
    URL_SAFE_NO_PAD.encode(mac_over(secret, unsigned).finalize().into_bytes())
}

pub fn create_token(secret: &[u8], principal: &Principal, expires_at_ms: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"HS256\",\"typ\":\"JWT\"}");
    let claims = serde_json::json!({
        "sub": principal.id,
        "role": principal.role.as_str(),
        "exp": expires_at_ms / 1000,
    });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    let unsigned = format!("{header}.{payload}");
    let sig = sign(secret, &unsigned);
    format!("{unsigned}.{sig}")
}

pub fn validate_token(secret: &[u8], token: &str) -> Result<Principal, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Malformed);
    }

    let unsigned = format!("{}.{}", parts[0], parts[1]);
    let presented = URL_SAFE_NO_PAD
        .decode(parts[2])
        .map_err(|_| TokenError::Malformed)?;
    // constant-time comparison
    if mac_over(secret, &unsigned).verify_slice(&presented).is_err() {
        return Err(TokenError::InvalidSignature);
    }

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|_| TokenError::Malformed)?;
    let claims: serde_json::Value =
        serde_json::from_slice(&payload_bytes).map_err(|_| TokenError::Malformed)?;

    let sub = claims["sub"]
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or(TokenError::Malformed)?
        .to_string();
    let role = claims["role"]
        .as_str()
        .map(Role::from_claim)
        .ok_or(TokenError::Malformed)?;

    if let Some(exp) = claims["exp"].as_i64() {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        if now > exp {
            return Err(TokenError::Expired);
        }
    }

    Ok(Principal::new(sub, role))
}

#[derive(Debug, PartialEq)]
pub enum TokenError {
    Malformed,
    InvalidSignature,
    Expired,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed token"),
            Self::InvalidSignature => write!(f, "invalid signature"),
            Self::Expired => write!(f, "token expired"),
        }
    }
}

impl std::error::Error for TokenError {}
