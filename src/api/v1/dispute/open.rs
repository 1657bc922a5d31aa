use crate::methods;
use warp::http::StatusCode;
use warp::{Filter, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("disputes" / "open")
        .and(warp::get())
        .and(warp::header::<String>("auth"))
        .and_then(async move |auth: String| {
            let caller = match methods::tokens::authenticate(&auth).await {
                Ok(token_row) => token_row,
                Err(e) => return methods::tokens::auth_error_reply(e),
            };
            let admin = match methods::user::get_user_by_id(caller.user_id).await {
                Ok(user) => user,
                Err(_) => {
                    return methods::standard_replies::internal_server_error_response(
                        "disputes/open: user lookup failed",
                    );
                }
            };
            if !admin.is_admin {
                return methods::standard_replies::forbidden("Administrator privileges required");
            }

            match methods::rental::open_disputes().await {
                Ok(disputed) => methods::standard_replies::response_with_obj(disputed, StatusCode::OK),
                Err(_) => methods::standard_replies::internal_server_error_response(
                    "disputes/open: database error",
                ),
            }
        })
}
