use chrono::{Duration, TimeZone, Utc};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::json;
use wine_auth::{AuthError, Session, peek_claims};

fn sign(claims: serde_json::Value) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"server-only-secret"),
    )
    .expect("encode")
}

fn session(token: String) -> Session {
    Session {
        api_url: "http://127.0.0.1:3000".to_string(),
        system_id: 1,
        system_name: "Bodega".to_string(),
        user_id: 2,
        username: "maria".to_string(),
        token,
    }
}

#[test]
fn claims_are_read_without_the_secret() {
    let token = sign(json!({"sub": 2, "iat": 1_700_000_000, "exp": 1_700_003_600}));
    let claims = peek_claims(&token).expect("claims");
    assert_eq!(claims.sub, Some(json!(2)));
    assert_eq!(
        claims.expires_at(),
        Some(Utc.with_ymd_and_hms(2023, 11, 14, 23, 13, 20).unwrap())
    );
    assert_eq!(claims.issued_at().map(|at| at.timestamp()), Some(1_700_000_000));
}

#[test]
fn expired_tokens_are_still_readable() {
    let token = sign(json!({"exp": 1}));
    let claims = peek_claims(&token).expect("claims");
    assert_eq!(claims.exp, Some(1));
}

#[test]
fn opaque_tokens_are_rejected() {
    let result = peek_claims("not-a-jwt");
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
}

#[test]
fn session_expiry_follows_exp_claim() {
    let now = Utc::now();
    let fresh = session(sign(json!({"exp": (now + Duration::hours(1)).timestamp()})));
    assert!(!fresh.is_expired(now));
    assert!(fresh.ensure_usable("http://127.0.0.1:3000", now).is_ok());

    let stale = session(sign(json!({"exp": (now - Duration::minutes(1)).timestamp()})));
    assert!(stale.is_expired(now));
    assert!(matches!(
        stale.ensure_usable("http://127.0.0.1:3000", now),
        Err(AuthError::SessionExpired)
    ));
}

#[test]
fn opaque_session_never_expires_locally() {
    let opaque = session("opaque-token".to_string());
    assert_eq!(opaque.expires_at(), None);
    assert!(!opaque.is_expired(Utc::now()));
}

#[test]
fn session_is_bound_to_its_server() {
    let session = session("opaque-token".to_string());
    assert!(matches!(
        session.ensure_usable("https://winesystem.servehttp.com", Utc::now()),
        Err(AuthError::NotLoggedIn)
    ));
    let ctx = session.context();
    assert_eq!(ctx.system_name, "Bodega");
    assert_eq!(ctx.user_id, 2);
}
