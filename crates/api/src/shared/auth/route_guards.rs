use crate::error::WayfourthError;
use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use wayfourth_reminders_domain::ID;
use wayfourth_reminders_infra::WayfourthContext;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    /// Expiration time (as UTC timestamp)
    exp: usize,
    /// Issued at (as UTC timestamp)
    iat: usize,
    /// The `User` this token was issued to
    user_id: ID,
}

fn parse_authtoken_header(token_header_value: &str) -> String {
    token_header_value
        .replace("Bearer", "")
        .replace("bearer", "")
        .trim()
        .to_string()
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .map(parse_authtoken_header)
}

fn decode_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let claims =
        decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256))?.claims;

    Ok(claims)
}

/// Resolves the current `User` from the auth token. How the token was
/// issued is not this service's concern, it only verifies the signature
/// and reads the user id claim.
pub fn protect_route(req: &HttpRequest, ctx: &WayfourthContext) -> Result<ID, WayfourthError> {
    let token = bearer_token(req).ok_or_else(|| {
        WayfourthError::Unauthorized(
            "Unable to find the authorization header on the request".into(),
        )
    })?;

    match decode_token(&token, &ctx.config.auth_secret) {
        Ok(claims) => Ok(claims.user_id),
        Err(_) => Err(WayfourthError::Unauthorized(
            "The given auth token is invalid or expired".into(),
        )),
    }
}

/// The sweep endpoint is only for the external cron scheduler. The shared
/// secret is always enforced, there is no bypass.
pub fn protect_sweep_route(
    req: &HttpRequest,
    ctx: &WayfourthContext,
) -> Result<(), WayfourthError> {
    let token = bearer_token(req).ok_or_else(|| {
        WayfourthError::Unauthorized(
            "Unable to find the authorization header on the request".into(),
        )
    })?;

    if token != ctx.config.sweep_secret {
        return Err(WayfourthError::Unauthorized(
            "The given sweep secret is invalid".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_for(user_id: &ID, secret: &str, expired: bool) -> String {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            exp: if expired { now - 100 } else { now + 3600 },
            iat: now,
            user_id: user_id.clone(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn parses_auth_header() {
        assert_eq!(parse_authtoken_header("Bearer xyz"), "xyz");
        assert_eq!(parse_authtoken_header("bearer xyz"), "xyz");
        assert_eq!(parse_authtoken_header("  xyz  "), "xyz");
    }

    #[actix_web::test]
    async fn accepts_valid_token() {
        let ctx = WayfourthContext::create_inmemory();
        let user_id = ID::new();
        let token = token_for(&user_id, &ctx.config.auth_secret, false);
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();

        assert_eq!(protect_route(&req, &ctx).unwrap(), user_id);
    }

    #[actix_web::test]
    async fn rejects_missing_expired_and_forged_tokens() {
        let ctx = WayfourthContext::create_inmemory();
        let user_id = ID::new();

        let req = TestRequest::default().to_http_request();
        assert!(protect_route(&req, &ctx).is_err());

        let expired = token_for(&user_id, &ctx.config.auth_secret, true);
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", expired)))
            .to_http_request();
        assert!(protect_route(&req, &ctx).is_err());

        let forged = token_for(&user_id, "some-other-secret", false);
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", forged)))
            .to_http_request();
        assert!(protect_route(&req, &ctx).is_err());
    }

    #[actix_web::test]
    async fn sweep_guard_requires_exact_secret() {
        let ctx = WayfourthContext::create_inmemory();

        let req = TestRequest::default()
            .insert_header((
                "Authorization",
                format!("Bearer {}", ctx.config.sweep_secret),
            ))
            .to_http_request();
        assert!(protect_sweep_route(&req, &ctx).is_ok());

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer wrong-secret"))
            .to_http_request();
        assert!(protect_sweep_route(&req, &ctx).is_err());

        let req = TestRequest::default().to_http_request();
        assert!(protect_sweep_route(&req, &ctx).is_err());
    }
}
