use crate::{POOL, methods, model};
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct AddFavoriteData {
    listing: Option<i32>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("favorites")
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and_then(async move |body: AddFavoriteData, auth: String| {
            let caller = match methods::tokens::authenticate(&auth).await {
                Ok(token_row) => token_row,
                Err(e) => return methods::tokens::auth_error_reply(e),
            };
            let Some(listing_id) = body.listing else {
                return methods::standard_replies::bad_request("Listing required");
            };

            if let Err(diesel::result::Error::NotFound) =
                methods::listing::get_listing_by_id(listing_id).await
            {
                return methods::standard_replies::not_found("Listing not found");
            }

            let caller_id = caller.user_id;
            let mut pool = POOL.get().unwrap();
            let already_there = spawn_blocking(move || {
                use crate::schema::favorites::dsl as favorite_q;
                diesel::select(diesel::dsl::exists(
                    favorite_q::favorites
                        .filter(favorite_q::user_id.eq(caller_id))
                        .filter(favorite_q::listing_id.eq(listing_id)),
                ))
                .get_result::<bool>(&mut pool)
            })
            .await
            .unwrap();

            match already_there {
                Ok(true) => return methods::standard_replies::conflict("Already in favourites"),
                Ok(false) => {}
                Err(_) => {
                    return methods::standard_replies::internal_server_error_response(
                        "favorites/add: duplicate check failed",
                    );
                }
            }

            let to_be_inserted = model::NewFavorite {
                user_id: caller.user_id,
                listing_id,
            };
            let mut pool = POOL.get().unwrap();
            let insert_result = spawn_blocking(move || {
                use crate::schema::favorites::dsl::*;
                diesel::insert_into(favorites)
                    .values(&to_be_inserted)
                    .get_result::<model::Favorite>(&mut pool)
            })
            .await
            .unwrap();

            match insert_result {
                Ok(favorite) => {
                    methods::standard_replies::response_with_obj(favorite, StatusCode::CREATED)
                }
                Err(_) => methods::standard_replies::internal_server_error_response(
                    "favorites/add: insert failed",
                ),
            }
        })
}
