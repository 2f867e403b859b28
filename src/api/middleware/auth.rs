use crate::services::policy::Actor;
use crate::utils::auth::validate_jwt;
use crate::{AppState, entities::prelude::Users};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use sea_orm::EntityTrait;

fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

async fn resolve_actor(
    state: &AppState,
    token: Option<String>,
) -> Result<Option<Actor>, StatusCode> {
    let Some(token) = token else {
        return Ok(None);
    };

    let Ok(claims) = validate_jwt(&token, &state.config.jwt_secret) else {
        return Ok(None);
    };

    // The token must still map to an existing user
    let user = Users::find_by_id(claims.sub)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(user.map(|user| Actor {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
    }))
}

/// Rejects with 401 unless a valid bearer token resolves to an existing
/// user; inserts the `Actor` for the handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = bearer_token(&req);
    match resolve_actor(&state, token).await? {
        Some(actor) => {
            req.extensions_mut().insert(actor);
            Ok(next.run(req).await)
        }
        None => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Never rejects; inserts `Some(actor)` for a valid token and `None`
/// otherwise, so read endpoints can serve anonymous callers the public
/// subset.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = bearer_token(&req);
    let actor = resolve_actor(&state, token).await?;
    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}
