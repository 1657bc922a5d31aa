use crate::{POOL, methods, model};
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct UpdateUserData {
    name: Option<String>,
    phone: Option<String>,
    location: Option<String>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("users" / i32)
        .and(warp::put())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and_then(
            async move |user_id: i32, update_data: UpdateUserData, auth: String| {
                let caller = match methods::tokens::authenticate(&auth).await {
                    Ok(token_row) => token_row,
                    Err(e) => return methods::tokens::auth_error_reply(e),
                };
                if caller.user_id != user_id {
                    return methods::standard_replies::forbidden(
                        "You may only update your own profile",
                    );
                }
                if update_data.name.is_none()
                    && update_data.phone.is_none()
                    && update_data.location.is_none()
                {
                    return methods::standard_replies::bad_request("No update data provided");
                }

                let changes = model::UserChanges {
                    name: update_data.name,
                    phone: update_data.phone,
                    location: update_data.location,
                };
                let mut pool = POOL.get().unwrap();
                let update_result = spawn_blocking(move || {
                    use crate::schema::users::dsl::*;
                    diesel::update(users.find(user_id))
                        .set(&changes)
                        .get_result::<model::User>(&mut pool)
                })
                .await
                .unwrap();

                match update_result {
                    Ok(user) => methods::standard_replies::response_with_obj(
                        user.to_publish_user(),
                        StatusCode::OK,
                    ),
                    Err(diesel::result::Error::NotFound) => {
                        methods::standard_replies::not_found("User not found")
                    }
                    Err(_) => methods::standard_replies::internal_server_error_response(
                        "users/update: database error",
                    ),
                }
            },
        )
}
