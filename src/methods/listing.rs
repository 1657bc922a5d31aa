use crate::POOL;
use crate::model::Listing;
use diesel::prelude::*;
use tokio::task::spawn_blocking;

pub async fn get_listing_by_id(_listing_id: i32) -> QueryResult<Listing> {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        use crate::schema::listings::dsl::*;
        listings
            .filter(id.eq(&_listing_id))
            .get_result::<Listing>(&mut pool)
    })
    .await
    .unwrap()
}

/// Availability flips are a single targeted UPDATE so concurrent rental
/// traffic on other listings never interferes.
pub async fn set_availability(_listing_id: i32, _available: bool) -> QueryResult<Listing> {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        use crate::schema::listings::dsl::*;
        diesel::update(listings.find(_listing_id))
            .set(available.eq(_available))
            .get_result::<Listing>(&mut pool)
    })
    .await
    .unwrap()
}
