use axum::{response::IntoResponse, routing::get, Extension, Json, Router};

use crate::{
    middleware::AuthUser,
    models::users::{FilterUserDto, UserData, UserResponseDto},
    Result,
};

pub fn users_handler() -> Router {
    Router::new().route("/me", get(get_me))
}

async fn get_me(Extension(user): Extension<AuthUser>) -> Result<impl IntoResponse> {
    let filtered_user = FilterUserDto::filter_user(&user.user);

    let response_data = UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: filtered_user,
        },
    };

    Ok(Json(response_data))
}
