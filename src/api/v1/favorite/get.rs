use crate::helper_model::FavoriteWithListing;
use crate::{POOL, methods, model};
use diesel::prelude::*;
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::{Filter, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("favorites" / i32)
        .and(warp::get())
        .and_then(async move |user_id: i32| {
            let mut pool = POOL.get().unwrap();
            let rows_result = spawn_blocking(move || {
                use crate::schema::favorites::dsl as favorite_q;
                use crate::schema::listings::dsl as listing_q;
                favorite_q::favorites
                    .inner_join(listing_q::listings)
                    .filter(favorite_q::user_id.eq(user_id))
                    .order(favorite_q::created_at.desc())
                    .get_results::<(model::Favorite, model::Listing)>(&mut pool)
            })
            .await
            .unwrap();

            match rows_result {
                Ok(rows) => {
                    let populated: Vec<FavoriteWithListing> = rows
                        .into_iter()
                        .map(|(favorite, listing)| FavoriteWithListing { favorite, listing })
                        .collect();
                    methods::standard_replies::response_with_obj(populated, StatusCode::OK)
                }
                Err(_) => methods::standard_replies::internal_server_error_response(
                    "favorites/get: database error",
                ),
            }
        })
}
