use crate::helper_model::ErrorResponse;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

fn error_reply(msg: &str, status: StatusCode) -> Result<(warp::reply::Response,), Rejection> {
    let body = ErrorResponse {
        error: msg.to_string(),
    };
    Ok::<_, Rejection>((
        warp::reply::with_status(warp::reply::json(&body), status).into_response(),
    ))
}

pub fn bad_request(msg: &str) -> Result<(warp::reply::Response,), Rejection> {
    error_reply(msg, StatusCode::BAD_REQUEST)
}

pub fn forbidden(msg: &str) -> Result<(warp::reply::Response,), Rejection> {
    error_reply(msg, StatusCode::FORBIDDEN)
}

pub fn not_found(msg: &str) -> Result<(warp::reply::Response,), Rejection> {
    error_reply(msg, StatusCode::NOT_FOUND)
}

pub fn conflict(msg: &str) -> Result<(warp::reply::Response,), Rejection> {
    error_reply(msg, StatusCode::CONFLICT)
}

pub fn internal_server_error_response(context: &str) -> Result<(warp::reply::Response,), Rejection> {
    eprintln!("internal error: {}", context);
    error_reply("Please try again later", StatusCode::INTERNAL_SERVER_ERROR)
}

pub fn response_with_obj<T>(
    obj: T,
    status_code: StatusCode,
) -> Result<(warp::reply::Response,), Rejection>
where
    T: serde::Serialize,
{
    Ok((warp::reply::with_status(warp::reply::json(&obj), status_code).into_response(),))
}

/// Login/registration reply: the user in the body, the fresh token in a
/// `token` response header.
pub fn auth_user_reply(
    user: &crate::model::PublishUser,
    token_data: &crate::model::PublishAccessToken,
    is_created: bool,
) -> Result<(warp::reply::Response,), Rejection> {
    let reply = warp::reply::json(&user);
    let reply = warp::reply::with_header(reply, "token", token_data.token.clone());
    let status_code = if is_created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((warp::reply::with_status(reply, status_code).into_response(),))
}
