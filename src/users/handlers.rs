use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::dto::{RegisterUserRequest, UserView};
use crate::{
    auth::password::hash_password,
    error::{AppError, MessageBody},
    extract::{IdPath, JsonBody},
    state::AppState,
    store::NewUser,
    validation::{parse_body, require_fields},
};

const REQUIRED: &[&str] = &["name", "mail", "password"];

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(list_users).post(register_user))
        .route("/user/:id", get(get_user))
        .route("/user/:id/", get(get_user))
}

#[instrument(skip(state, payload))]
pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Json<MessageBody>, AppError> {
    require_fields(&payload, REQUIRED)?;
    let body: RegisterUserRequest = parse_body(payload)?;

    if state.store.find_user_by_mail(&body.mail).await?.is_some() {
        warn!(mail = %body.mail, "mail already registered");
        return Err(AppError::Duplicate("User"));
    }

    let password_hash = hash_password(&body.password)?;
    let user = state
        .store
        .insert_user(NewUser {
            name: body.name,
            mail: body.mail,
            password_hash,
        })
        .await?;

    info!(user_id = user.id, mail = %user.mail, "user registered");
    Ok(MessageBody::new("User created successfully"))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, AppError> {
    let users = state.store.list_users().await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// Zero or one user; an unknown id is an empty list, not a 404.
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Vec<UserView>>, AppError> {
    let user = state.store.find_user(id).await?;
    Ok(Json(user.into_iter().map(UserView::from).collect()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::test_support::{send, send_json, send_raw, test_app};

    #[tokio::test]
    async fn register_then_list() {
        let app = test_app();
        let (status, body) = send_json(
            &app,
            Method::POST,
            "/user",
            Some(json!({"name": "Ana", "mail": "a@x.com", "password": "p"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"msg": "User created successfully"}));

        let (status, body) = send_json(&app, Method::GET, "/user", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"id": 1, "email": "a@x.com"}]));
    }

    #[tokio::test]
    async fn projections_never_expose_password() {
        let app = test_app();
        send(
            &app,
            Method::POST,
            "/user",
            Some(json!({"name": "Ana", "mail": "a@x.com", "password": "s3cret"})),
            None,
        )
        .await;

        for uri in ["/user", "/user/1/", "/user/1"] {
            let (status, bytes) = send(&app, Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::OK);
            let text = String::from_utf8(bytes).unwrap();
            assert!(!text.contains("password"), "{uri}: {text}");
            assert!(!text.contains("s3cret"), "{uri}: {text}");
            assert!(!text.contains("argon2"), "{uri}: {text}");
        }
    }

    #[tokio::test]
    async fn duplicate_mail_is_rejected_once_stored() {
        let app = test_app();
        let body = json!({"name": "Ana", "mail": "a@x.com", "password": "p"});
        let (first, _) = send_json(&app, Method::POST, "/user", Some(body.clone()), None).await;
        let (second, msg) = send_json(&app, Method::POST, "/user", Some(body), None).await;
        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::UNAUTHORIZED);
        assert_eq!(msg, json!({"msg": "User already exists"}));

        let (_, list) = send_json(&app, Method::GET, "/user", None, None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_fields_are_reported_in_order() {
        let app = test_app();
        let cases = [
            (json!({"mail": "a@x.com", "password": "p"}), "No name was provided"),
            (json!({"name": "Ana", "password": "p"}), "No mail was provided"),
            (json!({"name": "Ana", "mail": "a@x.com"}), "No password was provided"),
            (json!({}), "No name was provided"),
        ];
        for (body, expected) in cases {
            let (status, msg) = send_json(&app, Method::POST, "/user", Some(body), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(msg["msg"], expected);
        }
    }

    #[tokio::test]
    async fn mail_is_stored_and_compared_verbatim() {
        let app = test_app();
        for mail in ["Ana@X.com", "ana@x.com", "cy@local"] {
            let (status, _) = send_json(
                &app,
                Method::POST,
                "/user",
                Some(json!({"name": "Ana", "mail": mail, "password": "p"})),
                None,
            )
            .await;
            assert_eq!(status, StatusCode::OK, "{mail}");
        }

        let (_, list) = send_json(&app, Method::GET, "/user", None, None).await;
        assert_eq!(
            list,
            json!([
                {"id": 1, "email": "Ana@X.com"},
                {"id": 2, "email": "ana@x.com"},
                {"id": 3, "email": "cy@local"}
            ])
        );

        // login matches the exact mail only
        let (status, _) = send_json(
            &app,
            Method::POST,
            "/login",
            Some(json!({"mail": "ANA@X.COM", "password": "p"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_json_bad_request() {
        let app = test_app();
        let (status, body) = send_json(&app, Method::GET, "/user/abc/", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["msg"].as_str().is_some_and(|m| !m.is_empty()), "{body}");
    }

    #[tokio::test]
    async fn unreadable_bodies_get_json_errors() {
        let app = test_app();

        let (status, bytes) =
            send_raw(&app, Method::POST, "/user", "{bad", Some("application/json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json error body");
        assert!(body["msg"].is_string());

        let (status, bytes) = send_raw(
            &app,
            Method::POST,
            "/user",
            r#"{"name":"Ana","mail":"a@x.com","password":"p"}"#,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json error body");
        assert!(body["msg"].is_string());
    }

    #[tokio::test]
    async fn empty_collection_and_unknown_id_are_empty_lists() {
        let app = test_app();
        let (status, body) = send_json(&app, Method::GET, "/user", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = send_json(&app, Method::GET, "/user/42/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
