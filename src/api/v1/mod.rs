mod dispute;
mod favorite;
mod listing;
mod notification;
mod rental;
mod review;
mod user;

use warp::Filter;

pub fn api_v1() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("v1").and(
        user::api_v1_user()
            .or(listing::api_v1_listing())
            .or(rental::api_v1_rental())
            .or(dispute::api_v1_dispute())
            .or(notification::api_v1_notification())
            .or(favorite::api_v1_favorite())
            .or(review::api_v1_review()),
    )
}
