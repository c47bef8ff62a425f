use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Registered claims we care about; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct JwtClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default, alias = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// What can be read from the bearer token without verifying it.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenInspection {
    pub present: bool,
    pub subject: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub expired: bool,
    pub error: Option<String>,
}

/// Decode the payload segment of a JWT. The signature is not checked.
pub fn decode_claims(token: &str) -> Result<JwtClaims, String> {
    let mut parts = token.trim().split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err("Token is not a three-part JWT".to_string()),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| format!("Invalid base64 payload: {}", e))?;

    serde_json::from_slice(&bytes).map_err(|e| format!("Invalid JSON payload: {}", e))
}

pub fn inspect_token(token: Option<&str>, now: DateTime<Utc>) -> TokenInspection {
    let token = match token {
        Some(token) if !token.trim().is_empty() => token,
        _ => {
            return TokenInspection {
                error: Some("No token configured".to_string()),
                ..Default::default()
            }
        }
    };

    match decode_claims(token) {
        Ok(claims) => {
            let expires_at = claims.exp.and_then(timestamp);
            TokenInspection {
                present: true,
                subject: claims.sub.or(claims.user_id),
                issued_at: claims.iat.and_then(timestamp),
                expires_at,
                expired: expires_at.map(|exp| exp <= now).unwrap_or(false),
                error: None,
            }
        }
        Err(e) => TokenInspection {
            present: true,
            error: Some(e),
            ..Default::default()
        },
    }
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_inspect_valid_token() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let token = make_token(r#"{"sub":"user-42","iat":1699990000,"exp":1700003600}"#);

        let inspection = inspect_token(Some(&token), now);
        assert!(inspection.present);
        assert_eq!(inspection.subject.as_deref(), Some("user-42"));
        assert!(!inspection.expired);
        assert!(inspection.error.is_none());
    }

    #[test]
    fn test_inspect_expired_token_with_user_id_claim() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let token = make_token(r#"{"userId":"user-7","exp":1699999999}"#);

        let inspection = inspect_token(Some(&token), now);
        assert!(inspection.expired);
        assert_eq!(inspection.subject.as_deref(), Some("user-7"));
    }

    #[test]
    fn test_malformed_tokens_reported() {
        let now = Utc::now();
        assert!(inspect_token(Some("not-a-jwt"), now).error.is_some());
        assert!(inspect_token(Some("a.!!!.c"), now).error.is_some());
        assert!(!inspect_token(None, now).present);
    }
}
