use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{create_user, list_users};

pub fn routes() -> Router<Database> {
    Router::new().route("/", get(list_users).post(create_user))
}
