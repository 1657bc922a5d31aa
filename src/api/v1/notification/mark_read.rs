use crate::{POOL, methods, model};
use diesel::prelude::*;
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::{Filter, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("notifications" / i32 / "read")
        .and(warp::patch())
        .and(warp::header::<String>("auth"))
        .and_then(async move |notification_id: i32, auth: String| {
            let caller = match methods::tokens::authenticate(&auth).await {
                Ok(token_row) => token_row,
                Err(e) => return methods::tokens::auth_error_reply(e),
            };

            let mut pool = POOL.get().unwrap();
            let row_result = spawn_blocking(move || {
                use crate::schema::notifications::dsl::*;
                notifications
                    .filter(id.eq(notification_id))
                    .get_result::<model::Notification>(&mut pool)
            })
            .await
            .unwrap();

            let row = match row_result {
                Ok(row) => row,
                Err(diesel::result::Error::NotFound) => {
                    return methods::standard_replies::not_found("Notification not found");
                }
                Err(_) => {
                    return methods::standard_replies::internal_server_error_response(
                        "notifications/read: database error",
                    );
                }
            };
            if row.user_id != caller.user_id {
                return methods::standard_replies::forbidden(
                    "You may only update your own notifications",
                );
            }

            let mut pool = POOL.get().unwrap();
            let update_result = spawn_blocking(move || {
                use crate::schema::notifications::dsl::*;
                diesel::update(notifications.find(notification_id))
                    .set(read.eq(true))
                    .get_result::<model::Notification>(&mut pool)
            })
            .await
            .unwrap();

            match update_result {
                Ok(updated) => methods::standard_replies::response_with_obj(updated, StatusCode::OK),
                Err(_) => methods::standard_replies::internal_server_error_response(
                    "notifications/read: update failed",
                ),
            }
        })
}
