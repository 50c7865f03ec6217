use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::{
        cookies::{clear_session_cookie, session_cookie},
        dto::{LoginData, LoginRequest, PublicUser, RegisterRequest, SessionUser, UpdateRoleRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        services,
        validation::{validate_login, validate_register, validate_update_role},
    },
    error::ApiError,
    response::{ApiResponse, Created},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        // TODO: restrict role updates to admin callers once the dashboard
        // stops calling this endpoint without a session.
        .route("/update-user", post(update_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Created<PublicUser>, ApiError> {
    payload.email = services::normalize_email(&payload.email);
    validate_register(&payload)?;

    let user = services::register(&state.db, payload).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Created(ApiResponse::ok(
        "User registered successfully",
        PublicUser::from(&user),
    )))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<LoginData>), ApiError> {
    payload.email = services::normalize_email(&payload.email);
    validate_login(&payload)?;

    let keys = JwtKeys::from_ref(&state);
    let (user, token) = services::login(&state.db, &keys, payload).await?;

    let jar = CookieJar::new().add(session_cookie(&token, keys.ttl.as_secs() as i64));

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        jar,
        ApiResponse::ok(
            "User logged in successfully",
            LoginData {
                user: SessionUser::from(&user),
                token,
            },
        ),
    ))
}

#[instrument]
pub async fn logout() -> (CookieJar, ApiResponse<()>) {
    let jar = CookieJar::new().add(clear_session_cookie());
    (jar, ApiResponse::ok_empty("User logged out successfully"))
}

#[instrument(skip_all)]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<ApiResponse<SessionUser>, ApiError> {
    let user = services::get_user(&state.db, claims.sub).await?;
    Ok(ApiResponse::ok(
        "User retrieved successfully",
        SessionUser::from(&user),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Created<()>, ApiError> {
    let (user_id, role) = validate_update_role(&payload)?;
    services::update_role(&state.db, user_id, role).await?;

    info!(user_id = %user_id, role = role.as_str(), "role updated");
    Ok(Created(ApiResponse::ok_empty("Role updated successfully")))
}
