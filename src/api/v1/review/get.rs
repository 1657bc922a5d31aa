use crate::helper_model::ReviewWithReviewer;
use crate::{POOL, methods, model};
use diesel::prelude::*;
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::{Filter, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("reviews" / i32)
        .and(warp::get())
        .and_then(async move |listing_id: i32| {
            let mut pool = POOL.get().unwrap();
            let rows_result = spawn_blocking(move || {
                use crate::schema::reviews::dsl as review_q;
                use crate::schema::users::dsl as user_q;
                review_q::reviews
                    .inner_join(user_q::users)
                    .filter(review_q::listing_id.eq(listing_id))
                    .order(review_q::created_at.desc())
                    .select((crate::schema::reviews::all_columns, user_q::name))
                    .get_results::<(model::Review, String)>(&mut pool)
            })
            .await
            .unwrap();

            match rows_result {
                Ok(rows) => {
                    let populated: Vec<ReviewWithReviewer> = rows
                        .into_iter()
                        .map(|(review, reviewer_name)| ReviewWithReviewer {
                            review,
                            reviewer_name,
                        })
                        .collect();
                    methods::standard_replies::response_with_obj(populated, StatusCode::OK)
                }
                Err(_) => methods::standard_replies::internal_server_error_response(
                    "reviews/get: database error",
                ),
            }
        })
}
