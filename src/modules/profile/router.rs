use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{get_me, get_token_header, post_form};

pub fn init_profile_router() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route("/token", get(get_token_header))
        .route("/form", post(post_form))
}
