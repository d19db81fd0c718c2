use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{JwtKeys, LoginRequest, TokenResponse},
        password::check_credentials,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Every failure, including an unreadable body, yields the same 401.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let creds: LoginRequest = payload
        .ok()
        .and_then(|Json(v)| serde_json::from_value(v).ok())
        .unwrap_or_default();
    let (Some(mail), Some(password)) = (creds.mail, creds.password) else {
        warn!("login without mail or password");
        return Err(AppError::AuthenticationFailure);
    };

    let user = state.store.find_user_by_mail(&mail).await?;
    let known = user.is_some();
    let verified = check_credentials(&password, user.as_ref().map(|u| u.password_hash.as_str()))?;
    let Some(user) = user.filter(|_| verified) else {
        warn!(mail = %mail, known, "login rejected");
        return Err(AppError::AuthenticationFailure);
    };

    let token = JwtKeys::from_ref(&state).sign(&user.mail)?;

    info!(user_id = user.id, mail = %user.mail, "user logged in");
    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::test_support::{register_and_login, send, send_json, send_raw, test_app};

    #[tokio::test]
    async fn login_issues_token_for_valid_credentials() {
        let app = test_app();
        let token = register_and_login(&app, "a@x.com").await;
        assert_eq!(token.split('.').count(), 3);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let app = test_app();
        register_and_login(&app, "a@x.com").await;

        let wrong_password = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({"mail": "a@x.com", "password": "nope"})),
            None,
        )
        .await;
        let unknown_mail = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({"mail": "ghost@x.com", "password": "p4ss"})),
            None,
        )
        .await;

        assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_mail.0, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.1, unknown_mail.1);
    }

    #[tokio::test]
    async fn login_with_missing_field_is_unauthorized() {
        let app = test_app();
        let (status, body) = send_json(
            &app,
            Method::POST,
            "/login",
            Some(json!({"mail": "a@x.com"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["msg"], "Bad mail or password");
    }

    #[tokio::test]
    async fn malformed_login_body_is_a_plain_auth_failure() {
        let app = test_app();
        let (_, expected) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({"mail": "ghost@x.com", "password": "p"})),
            None,
        )
        .await;

        let (status, garbled) =
            send_raw(&app, Method::POST, "/login", "{bad", Some("application/json")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(garbled, expected);

        let (status, untyped) = send_raw(
            &app,
            Method::POST,
            "/login",
            r#"{"mail":"ghost@x.com","password":"p"}"#,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(untyped, expected);
    }
}
