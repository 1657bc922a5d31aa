use crate::{POOL, methods, model};
use bcrypt::{DEFAULT_COST, hash};
use diesel::prelude::*;
use regex::Regex;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct CreateUserData {
    name: String,
    email: String,
    password: String,
    phone: Option<String>,
}

fn is_valid_email(email: &str) -> bool {
    // RFC 5321 length limit
    if email.len() > 254 {
        return false;
    }
    lazy_static::lazy_static! {
        static ref EMAIL_REGEX: Regex = Regex::new(
            r"(?i)^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9-](?:[a-z0-9-]{0,61}[a-z0-9])+(?:\.[a-z0-9-](?:[a-z0-9-]{0,61}[a-z0-9])+)+$"
        ).expect("Invalid regex");
    }
    EMAIL_REGEX.is_match(email)
}

fn is_valid_phone_number(phone: &str) -> bool {
    lazy_static::lazy_static! {
        static ref PHONE_REGEX: Regex = Regex::new(
            r"^\+?\d{7,15}$"
        ).expect("Invalid phone number regex");
    }
    PHONE_REGEX.is_match(phone)
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("users")
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::header::optional::<String>("x-client-type"))
        .and_then(
            async move |mut user_create_data: CreateUserData, client_type: Option<String>| {
                if !is_valid_email(&user_create_data.email) {
                    return methods::standard_replies::bad_request(
                        "Please check your email format",
                    );
                }
                if let Some(phone_number) = &user_create_data.phone {
                    if !is_valid_phone_number(phone_number) {
                        return methods::standard_replies::bad_request(
                            "Please check your phone number format",
                        );
                    }
                }
                if user_create_data.password.len() < 8 {
                    return methods::standard_replies::bad_request(
                        "Password must be at least 8 characters",
                    );
                }

                let email_clone = user_create_data.email.clone();
                let mut pool = POOL.get().unwrap();
                let existing = spawn_blocking(move || {
                    use crate::schema::users::dsl::*;
                    users
                        .filter(email.eq(&email_clone))
                        .get_result::<model::User>(&mut pool)
                })
                .await
                .unwrap();

                match existing {
                    Ok(_user) => methods::standard_replies::conflict("Email already in use"),
                    Err(diesel::result::Error::NotFound) => {
                        let hashed_pass = hash(&user_create_data.password, DEFAULT_COST).unwrap();
                        user_create_data.password = hashed_pass;

                        let to_be_inserted = model::NewUser {
                            name: user_create_data.name,
                            email: user_create_data.email,
                            password: user_create_data.password,
                            phone: user_create_data.phone,
                        };
                        let mut pool = POOL.get().unwrap();
                        let inserted = spawn_blocking(move || {
                            use crate::schema::users::dsl::*;
                            diesel::insert_into(users)
                                .values(&to_be_inserted)
                                .get_result::<model::User>(&mut pool)
                        })
                        .await
                        .unwrap();

                        let Ok(user) = inserted else {
                            return methods::standard_replies::internal_server_error_response(
                                "users/create: insert failed",
                            );
                        };

                        let Ok(token_row) =
                            methods::tokens::issue_token(user.id, client_type).await
                        else {
                            return methods::standard_replies::internal_server_error_response(
                                "users/create: token issue failed",
                            );
                        };

                        methods::standard_replies::auth_user_reply(
                            &user.to_publish_user(),
                            &token_row.to_publish_access_token(),
                            true,
                        )
                    }
                    Err(_) => methods::standard_replies::internal_server_error_response(
                        "users/create: lookup failed",
                    ),
                }
            },
        )
}
