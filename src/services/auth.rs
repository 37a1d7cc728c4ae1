use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

pub const ADMIN_TOKEN_TTL_SECS: i64 = 8 * 60 * 60;

/// Checks a password against the configured bcrypt hash. An empty hash
/// means admin login is switched off.
pub fn verify_password(password_hash: &str, password: &str) -> bool {
    if password_hash.is_empty() {
        return false;
    }
    match bcrypt::verify(password, password_hash) {
        Ok(ok) => ok,
        Err(e) => {
            tracing::error!(error = %e, "admin password hash is malformed");
            false
        }
    }
}

fn mac_for(secret: &str, expires_at: i64) -> Option<HmacSha1> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("admin:{expires_at}").as_bytes());
    Some(mac)
}

/// Bearer token of the form `<expiry unix secs>.<base64 hmac>`.
pub fn issue_token(secret: &str, now: i64) -> Option<String> {
    let expires_at = now + ADMIN_TOKEN_TTL_SECS;
    let signature = mac_for(secret, expires_at)?.finalize().into_bytes();
    Some(format!("{expires_at}.{}", URL_SAFE_NO_PAD.encode(signature)))
}

pub fn verify_token(secret: &str, token: &str, now: i64) -> bool {
    let Some((expires, signature)) = token.split_once('.') else {
        return false;
    };
    let Ok(expires_at) = expires.parse::<i64>() else {
        return false;
    };
    if expires_at <= now {
        return false;
    }
    let Ok(signature) = URL_SAFE_NO_PAD.decode(signature) else {
        return false;
    };
    match mac_for(secret, expires_at) {
        Some(mac) => mac.verify_slice(&signature).is_ok(),
        None => false,
    }
}
