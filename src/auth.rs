use std::collections::HashSet;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /user/login`.
#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Claims we read from the backend-issued token. Only `exp` matters here.
#[derive(Deserialize, Debug, Clone)]
pub struct TokenClaims {
    pub exp: Option<u64>,
}

/// Pull `(token, empId)` out of a login response body.
///
/// `empId` is sent as a string by some backend versions and as a number by
/// others; both are normalized to text. Returns `None` unless both are present
/// and non-empty.
pub fn login_fields(body: &Value) -> Option<(String, String)> {
    let token = body.get("token")?.as_str()?.to_string();
    let employee_id = match body.get("empId")? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if token.is_empty() || employee_id.is_empty() {
        return None;
    }
    Some((token, employee_id))
}

/// True when `token` is a readable JWT whose `exp` lies before `now`
/// (seconds since the epoch).
///
/// The signing secret lives on the backend, so the signature is not checked.
/// Tokens that are not JWTs, or carry no `exp`, are never reported expired.
pub fn token_expired(token: &str, now: u64) -> bool {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    match decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => matches!(data.claims.exp, Some(exp) if exp < now),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: u64,
    }

    fn jwt(exp: u64) -> String {
        let claims = Claims {
            sub: "emp-1".to_string(),
            exp,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend_only_secret")).unwrap()
    }

    #[test]
    fn test_expired_jwt_is_detected_without_secret() {
        assert!(token_expired(&jwt(1_000), 2_000));
        assert!(!token_expired(&jwt(3_000), 2_000));
    }

    #[test]
    fn test_opaque_token_is_not_judged() {
        assert!(!token_expired("not-a-jwt", u64::MAX));
        assert!(!token_expired("", 0));
    }

    #[test]
    fn test_login_fields_normalize_numeric_emp_id() {
        assert_eq!(
            login_fields(&json!({"token": "abc", "empId": 17})),
            Some(("abc".to_string(), "17".to_string()))
        );
        assert_eq!(
            login_fields(&json!({"token": "abc", "empId": "E-17"})),
            Some(("abc".to_string(), "E-17".to_string()))
        );
    }

    #[test]
    fn test_login_fields_require_both() {
        assert_eq!(login_fields(&json!({"token": "abc"})), None);
        assert_eq!(login_fields(&json!({"empId": "E-1"})), None);
        assert_eq!(login_fields(&json!({"token": "", "empId": "E-1"})), None);
        assert_eq!(login_fields(&json!({"message": "nope"})), None);
    }
}
