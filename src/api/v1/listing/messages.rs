use crate::{POOL, methods, model};
use diesel::prelude::*;
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::{Filter, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("listings" / i32 / "messages")
        .and(warp::get())
        .and(warp::header::<String>("auth"))
        .and_then(async move |listing_id: i32, auth: String| {
            let caller = match methods::tokens::authenticate(&auth).await {
                Ok(token_row) => token_row,
                Err(e) => return methods::tokens::auth_error_reply(e),
            };

            let caller_id = caller.user_id;
            let mut pool = POOL.get().unwrap();
            let thread_result = spawn_blocking(move || {
                use crate::schema::listing_messages::dsl as lm_q;
                lm_q::listing_messages
                    .filter(lm_q::listing_id.eq(listing_id))
                    .filter(
                        lm_q::from_user_id
                            .eq(caller_id)
                            .or(lm_q::to_user_id.eq(caller_id)),
                    )
                    .order(lm_q::created_at.asc())
                    .get_results::<model::ListingMessage>(&mut pool)
            })
            .await
            .unwrap();

            match thread_result {
                Ok(thread) => methods::standard_replies::response_with_obj(thread, StatusCode::OK),
                Err(_) => methods::standard_replies::internal_server_error_response(
                    "listings/messages: database error",
                ),
            }
        })
}
