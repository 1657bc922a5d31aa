use crate::methods;
use bcrypt::verify;
use serde_derive::{Deserialize, Serialize};
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct LoginData {
    email: String,
    password: String,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("users" / "login")
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::header::optional::<String>("x-client-type"))
        .and_then(
            async move |login_data: LoginData, client_type: Option<String>| {
                let user_result = methods::user::get_user_by_email(login_data.email).await;
                let Ok(user) = user_result else {
                    // Same reply for unknown email and bad password.
                    return methods::standard_replies::bad_request("Invalid email or password");
                };

                let password_matches =
                    verify(&login_data.password, &user.password).unwrap_or(false);
                if !password_matches {
                    return methods::standard_replies::bad_request("Invalid email or password");
                }

                let Ok(token_row) = methods::tokens::issue_token(user.id, client_type).await
                else {
                    return methods::standard_replies::internal_server_error_response(
                        "users/login: token issue failed",
                    );
                };

                methods::standard_replies::auth_user_reply(
                    &user.to_publish_user(),
                    &token_row.to_publish_access_token(),
                    false,
                )
            },
        )
}
