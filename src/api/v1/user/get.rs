use crate::methods;
use warp::http::StatusCode;
use warp::{Filter, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("users" / i32)
        .and(warp::get())
        .and_then(async move |user_id: i32| {
            match methods::user::get_user_by_id(user_id).await {
                Ok(user) => methods::standard_replies::response_with_obj(
                    user.to_publish_user(),
                    StatusCode::OK,
                ),
                Err(diesel::result::Error::NotFound) => {
                    methods::standard_replies::not_found("User not found")
                }
                Err(_) => methods::standard_replies::internal_server_error_response(
                    "users/get: database error",
                ),
            }
        })
}
