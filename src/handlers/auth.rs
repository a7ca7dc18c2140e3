use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use tower_cookies::Cookie;
use validator::Validate;

use crate::{
    models::{
        response::Response,
        users::{LoginUserDto, RegisterUserDto, UserLoginResponseDto},
    },
    AppState, Error, Result,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    WithRejection(Json(new_user), _): WithRejection<Json<RegisterUserDto>, Error>,
) -> Result<impl IntoResponse> {
    new_user.validate()?;

    app_state
        .auth_service
        .register(&new_user.name, &new_user.email, &new_user.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Response {
            status: "success",
            message: "Registration successful! You can now log in.".to_string(),
        }),
    ))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    WithRejection(Json(user), _): WithRejection<Json<LoginUserDto>, Error>,
) -> Result<impl IntoResponse> {
    user.validate()?;

    let token = app_state
        .auth_service
        .login(&user.email, &user.password)
        .await?;

    let cookie_duration = time::Duration::minutes(app_state.auth_service.jwt_maxage());
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();
    let cookie = HeaderValue::from_str(&cookie.to_string())
        .map_err(|_| Error::InternalServerError)?;

    let mut response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
    })
    .into_response();
    response.headers_mut().append(header::SET_COOKIE, cookie);

    Ok(response)
}
