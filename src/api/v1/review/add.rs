use crate::{POOL, methods, model};
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct AddReviewData {
    listing: Option<i32>,
    rating: Option<i32>,
    comment: Option<String>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("reviews")
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and_then(async move |body: AddReviewData, auth: String| {
            let caller = match methods::tokens::authenticate(&auth).await {
                Ok(token_row) => token_row,
                Err(e) => return methods::tokens::auth_error_reply(e),
            };
            let Some(listing_id) = body.listing else {
                return methods::standard_replies::bad_request("Listing required");
            };
            let rating = match body.rating {
                Some(rating) if (1..=5).contains(&rating) => rating,
                _ => {
                    return methods::standard_replies::bad_request(
                        "Rating must be between 1 and 5",
                    );
                }
            };

            if let Err(diesel::result::Error::NotFound) =
                methods::listing::get_listing_by_id(listing_id).await
            {
                return methods::standard_replies::not_found("Listing not found");
            }

            let to_be_inserted = model::NewReview {
                listing_id,
                reviewer_id: caller.user_id,
                rating,
                comment: body.comment,
            };
            let mut pool = POOL.get().unwrap();
            let insert_result = spawn_blocking(move || {
                use crate::schema::reviews::dsl::*;
                diesel::insert_into(reviews)
                    .values(&to_be_inserted)
                    .get_result::<model::Review>(&mut pool)
            })
            .await
            .unwrap();

            match insert_result {
                Ok(review) => {
                    methods::standard_replies::response_with_obj(review, StatusCode::CREATED)
                }
                Err(_) => methods::standard_replies::internal_server_error_response(
                    "reviews/add: insert failed",
                ),
            }
        })
}
