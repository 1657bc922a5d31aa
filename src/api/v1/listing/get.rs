use crate::methods;
use warp::http::StatusCode;
use warp::{Filter, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("listings" / i32)
        .and(warp::get())
        .and_then(async move |listing_id: i32| {
            match methods::listing::get_listing_by_id(listing_id).await {
                Ok(listing) => methods::standard_replies::response_with_obj(listing, StatusCode::OK),
                Err(diesel::result::Error::NotFound) => {
                    methods::standard_replies::not_found("Listing not found")
                }
                Err(_) => methods::standard_replies::internal_server_error_response(
                    "listings/get: database error",
                ),
            }
        })
}
