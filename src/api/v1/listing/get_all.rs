use crate::{POOL, methods, model};
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct ListingFilters {
    category: Option<String>,
    location: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    available: Option<bool>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("listings")
        .and(warp::get())
        .and(warp::query::<ListingFilters>())
        .and_then(async move |filters: ListingFilters| {
            let mut pool = POOL.get().unwrap();
            let listings_result = spawn_blocking(move || {
                use crate::schema::listings::dsl::*;
                let mut query = listings.into_boxed();
                if let Some(category_filter) = filters.category {
                    query = query.filter(category.eq(category_filter));
                }
                if let Some(location_filter) = filters.location {
                    query = query.filter(location.eq(location_filter));
                }
                if let Some(min_price) = filters.min_price {
                    query = query.filter(price.ge(min_price));
                }
                if let Some(max_price) = filters.max_price {
                    query = query.filter(price.le(max_price));
                }
                if let Some(available_filter) = filters.available {
                    query = query.filter(available.eq(available_filter));
                }
                query
                    .order(created_at.desc())
                    .get_results::<model::Listing>(&mut pool)
            })
            .await
            .unwrap();

            match listings_result {
                Ok(all_listings) => {
                    methods::standard_replies::response_with_obj(all_listings, StatusCode::OK)
                }
                Err(_) => methods::standard_replies::internal_server_error_response(
                    "listings/get_all: database error",
                ),
            }
        })
}
