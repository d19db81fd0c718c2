use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::dto::CharacterView;
use crate::{
    auth::AuthUser,
    error::{AppError, MessageBody},
    extract::{IdPath, JsonBody},
    state::AppState,
    store::NewCharacter,
    validation::{parse_body, require_fields},
};

const REQUIRED: &[&str] = &["name", "gender", "hair_color", "eye_color"];

pub fn character_routes() -> Router<AppState> {
    Router::new()
        .route("/personajes", get(list_characters).post(register_character))
        .route("/personajes/:id", get(get_character))
        .route("/personajes/:id/", get(get_character))
}

#[instrument(skip(state, payload))]
pub async fn register_character(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Json<MessageBody>, AppError> {
    require_fields(&payload, REQUIRED)?;
    let new: NewCharacter = parse_body(payload)?;

    if state.store.find_matching_character(&new).await?.is_some() {
        warn!(name = %new.name, "character already exists");
        return Err(AppError::Duplicate("Character"));
    }

    let character = state.store.insert_character(new).await?;
    info!(character_id = character.id, %caller, "character registered");
    Ok(MessageBody::new("Character created successfully"))
}

#[instrument(skip(state))]
pub async fn list_characters(
    State(state): State<AppState>,
) -> Result<Json<Vec<CharacterView>>, AppError> {
    let rows = state.store.list_characters().await?;
    Ok(Json(rows.into_iter().map(CharacterView::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_character(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Vec<CharacterView>>, AppError> {
    let row = state.store.find_character(id).await?;
    Ok(Json(row.into_iter().map(CharacterView::from).collect()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::test_support::{register_and_login, send_json, test_app};

    fn luke() -> Value {
        json!({"name": "Luke Skywalker", "gender": "male", "hair_color": "blond", "eye_color": "blue"})
    }

    #[tokio::test]
    async fn register_requires_token() {
        let app = test_app();
        let (status, _) = send_json(&app, Method::POST, "/personajes", Some(luke()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send_json(
            &app,
            Method::POST,
            "/personajes",
            Some(luke()),
            Some("not-a-jwt"),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, list) = send_json(&app, Method::GET, "/personajes", None, None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn registering_twice_stores_one_record() {
        let app = test_app();
        let token = register_and_login(&app, "a@x.com").await;

        let (first, msg) =
            send_json(&app, Method::POST, "/personajes", Some(luke()), Some(&token)).await;
        assert_eq!(first, StatusCode::OK);
        assert_eq!(msg["msg"], "Character created successfully");

        let (second, msg) =
            send_json(&app, Method::POST, "/personajes", Some(luke()), Some(&token)).await;
        assert_eq!(second, StatusCode::UNAUTHORIZED);
        assert_eq!(msg["msg"], "Character already exists");

        let (_, list) = send_json(&app, Method::GET, "/personajes", None, None).await;
        assert_eq!(
            list,
            json!([{"id": 1, "name": "Luke Skywalker", "gender": "male", "hair_color": "blond", "eye_color": "blue"}])
        );
    }

    #[tokio::test]
    async fn one_differing_field_is_a_new_record() {
        let app = test_app();
        let token = register_and_login(&app, "a@x.com").await;
        send_json(&app, Method::POST, "/personajes", Some(luke()), Some(&token)).await;

        let mut other = luke();
        other["eye_color"] = json!("green");
        let (status, _) =
            send_json(&app, Method::POST, "/personajes", Some(other), Some(&token)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, list) = send_json(&app, Method::GET, "/personajes", None, None).await;
        assert_eq!(list.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn each_missing_field_is_named() {
        let app = test_app();
        let token = register_and_login(&app, "a@x.com").await;
        for field in ["name", "gender", "hair_color", "eye_color"] {
            let mut body = luke();
            body.as_object_mut().unwrap().remove(field);
            let (status, msg) =
                send_json(&app, Method::POST, "/personajes", Some(body), Some(&token)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(msg["msg"], format!("No {field} was provided"));
        }
    }

    #[tokio::test]
    async fn get_by_id_returns_zero_or_one_item() {
        let app = test_app();
        let token = register_and_login(&app, "a@x.com").await;
        send_json(&app, Method::POST, "/personajes", Some(luke()), Some(&token)).await;

        let (status, found) = send_json(&app, Method::GET, "/personajes/1/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["name"], "Luke Skywalker");

        let (status, missing) = send_json(&app, Method::GET, "/personajes/99/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(missing, json!([]));
    }

    #[tokio::test]
    async fn long_values_are_accepted() {
        let app = test_app();
        let token = register_and_login(&app, "a@x.com").await;
        let mut body = luke();
        body["name"] = json!("L".repeat(300));
        let (status, _) =
            send_json(&app, Method::POST, "/personajes", Some(body), Some(&token)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, found) = send_json(&app, Method::GET, "/personajes/1", None, None).await;
        assert_eq!(found[0]["name"].as_str().map(str::len), Some(300));
    }
}
