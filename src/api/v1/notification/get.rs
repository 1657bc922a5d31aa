use crate::{POOL, methods, model};
use diesel::prelude::*;
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::{Filter, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("notifications")
        .and(warp::get())
        .and(warp::header::<String>("auth"))
        .and_then(async move |auth: String| {
            let caller = match methods::tokens::authenticate(&auth).await {
                Ok(token_row) => token_row,
                Err(e) => return methods::tokens::auth_error_reply(e),
            };

            let caller_id = caller.user_id;
            let mut pool = POOL.get().unwrap();
            let rows_result = spawn_blocking(move || {
                use crate::schema::notifications::dsl::*;
                notifications
                    .filter(user_id.eq(caller_id))
                    .order(created_at.desc())
                    .get_results::<model::Notification>(&mut pool)
            })
            .await
            .unwrap();

            match rows_result {
                Ok(rows) => methods::standard_replies::response_with_obj(rows, StatusCode::OK),
                Err(_) => methods::standard_replies::internal_server_error_response(
                    "notifications/get: database error",
                ),
            }
        })
}
