use crate::{POOL, methods, model};
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct CreateListingData {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    price: Option<f64>,
    price_unit: Option<String>,
    location: Option<String>,
    images: Option<Vec<String>>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("listings")
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and_then(async move |listing_data: CreateListingData, auth: String| {
            let caller = match methods::tokens::authenticate(&auth).await {
                Ok(token_row) => token_row,
                Err(e) => return methods::tokens::auth_error_reply(e),
            };

            let (Some(title_text), Some(description_text), Some(category_text), Some(price_value), Some(location_text)) = (
                listing_data.title,
                listing_data.description,
                listing_data.category,
                listing_data.price,
                listing_data.location,
            ) else {
                return methods::standard_replies::bad_request("Missing required listing fields");
            };
            if price_value <= 0.0 {
                return methods::standard_replies::bad_request("Price must be positive");
            }

            let to_be_inserted = model::NewListing {
                owner_id: caller.user_id,
                title: title_text,
                description: description_text,
                category: category_text,
                images: listing_data.images.unwrap_or_default(),
                price: price_value,
                price_unit: listing_data
                    .price_unit
                    .unwrap_or_else(|| String::from("day")),
                location: location_text,
            };
            let mut pool = POOL.get().unwrap();
            let insert_result = spawn_blocking(move || {
                use crate::schema::listings::dsl::*;
                diesel::insert_into(listings)
                    .values(&to_be_inserted)
                    .get_result::<model::Listing>(&mut pool)
            })
            .await
            .unwrap();

            match insert_result {
                Ok(listing) => {
                    methods::standard_replies::response_with_obj(listing, StatusCode::CREATED)
                }
                Err(_) => methods::standard_replies::internal_server_error_response(
                    "listings/create: insert failed",
                ),
            }
        })
}
