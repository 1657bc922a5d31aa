use chrono::{DateTime, Utc};
use diesel::prelude::*;
use secrets::Secret;
use std::ops::Add;
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::POOL;
use crate::helper_model::{ErrorResponse, NkadimeError, RequestToken};
use crate::model::{AccessToken, NewAccessToken};

async fn generate_unique_token() -> Vec<u8> {
    loop {
        // Generate a secure random 32-byte token
        let token_vec = Secret::<[u8; 32]>::random(|s| s.to_vec());

        let token_to_return = token_vec.clone();

        let token_exists_result = spawn_blocking(move || {
            let mut pool = POOL.get().unwrap();
            diesel::select(diesel::dsl::exists(
                crate::schema::access_tokens::table
                    .filter(crate::schema::access_tokens::token.eq(token_vec)),
            ))
            .get_result::<bool>(&mut pool)
        })
        .await;

        let token_exists = match token_exists_result {
            Ok(Ok(exists)) => exists,
            Ok(Err(e)) => {
                // Treat a DB error as if the token exists, to force a retry.
                eprintln!("Database error checking token uniqueness: {:?}", e);
                true
            }
            Err(join_err) => {
                eprintln!("Error joining blocking task: {:?}", join_err);
                true
            }
        };

        if !token_exists {
            return token_to_return;
        }
    }
}

pub async fn gen_token_object(_user_id: i32, client_type: Option<String>) -> NewAccessToken {
    let mut _exp: DateTime<Utc> = Utc::now().add(chrono::Duration::seconds(600));
    if let Some(client_type) = client_type {
        if client_type == "nkadime-app" {
            _exp = Utc::now().add(chrono::Duration::days(28));
        }
    }
    NewAccessToken {
        user_id: _user_id,
        token: generate_unique_token().await,
        exp: _exp,
    }
}

pub async fn issue_token(_user_id: i32, client_type: Option<String>) -> QueryResult<AccessToken> {
    let new_token = gen_token_object(_user_id, client_type).await;
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        use crate::schema::access_tokens::dsl::*;
        diesel::insert_into(access_tokens)
            .values(&new_token)
            .get_result::<AccessToken>(&mut pool)
    })
    .await
    .unwrap()
}

/// The `auth` header carries `<hex-token>$<user_id>`.
pub fn parse_auth_header(auth: &str) -> Result<RequestToken, NkadimeError> {
    let token_and_id = auth.split('$').collect::<Vec<&str>>();
    if token_and_id.len() != 2 {
        return Err(NkadimeError::InvalidToken);
    }
    let user_id = token_and_id[1]
        .parse::<i32>()
        .map_err(|_| NkadimeError::InvalidToken)?;
    Ok(RequestToken {
        user_id,
        token: token_and_id[0].to_string(),
    })
}

pub async fn verify_user_token(
    _user_id: i32,
    token_data: &str,
) -> Result<AccessToken, NkadimeError> {
    let binary_token = hex::decode(token_data).map_err(|_| NkadimeError::TokenFormatError)?;
    let mut pool = POOL.get().unwrap();
    let token_row = spawn_blocking(move || {
        use crate::schema::access_tokens::dsl::*;
        access_tokens
            .filter(user_id.eq(_user_id))
            .filter(token.eq(binary_token))
            .first::<AccessToken>(&mut pool)
    })
    .await
    .map_err(|_| NkadimeError::DatabaseError)?;

    match token_row {
        Ok(row) if row.exp >= Utc::now() => Ok(row),
        Ok(_) | Err(diesel::result::Error::NotFound) => Err(NkadimeError::InvalidToken),
        Err(_) => Err(NkadimeError::DatabaseError),
    }
}

/// Sliding expiry. Never shortens a longer-lived app token.
pub async fn extend_token(token_row: AccessToken) -> QueryResult<AccessToken> {
    let new_exp = Utc::now().add(chrono::Duration::seconds(600));
    if new_exp <= token_row.exp {
        return Ok(token_row);
    }
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        use crate::schema::access_tokens::dsl::*;
        diesel::update(access_tokens.find(token_row.id))
            .set(exp.eq(new_exp))
            .get_result::<AccessToken>(&mut pool)
    })
    .await
    .unwrap()
}

/// Full auth preamble for an endpoint: parse the header, check the
/// token against the database, slide its expiry.
pub async fn authenticate(auth: &str) -> Result<AccessToken, NkadimeError> {
    let request_token = parse_auth_header(auth)?;
    let token_row = verify_user_token(request_token.user_id, &request_token.token).await?;
    extend_token(token_row)
        .await
        .map_err(|_| NkadimeError::DatabaseError)
}

pub fn token_not_hex_warp_return() -> Result<(warp::reply::Response,), Rejection> {
    let body = ErrorResponse {
        error: String::from("Token not in hex format"),
    };
    Ok::<_, Rejection>((warp::reply::with_status(
        warp::reply::json(&body),
        StatusCode::BAD_REQUEST,
    )
    .into_response(),))
}

pub fn token_invalid_return() -> Result<(warp::reply::Response,), Rejection> {
    let body = ErrorResponse {
        error: String::from("Token not valid"),
    };
    Ok::<_, Rejection>((warp::reply::with_status(
        warp::reply::json(&body),
        StatusCode::UNAUTHORIZED,
    )
    .into_response(),))
}

pub fn auth_error_reply(error: NkadimeError) -> Result<(warp::reply::Response,), Rejection> {
    match error {
        NkadimeError::TokenFormatError => token_not_hex_warp_return(),
        NkadimeError::InvalidToken => token_invalid_return(),
        _ => crate::methods::standard_replies::internal_server_error_response(
            "token verification unexpected error",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_header_splits_token_and_id() {
        let parsed = parse_auth_header("deadbeef$42").unwrap();
        assert_eq!(parsed.user_id, 42);
        assert_eq!(parsed.token, "deadbeef");
    }

    #[test]
    fn auth_header_rejects_malformed_input() {
        assert!(parse_auth_header("deadbeef").is_err());
        assert!(parse_auth_header("deadbeef$42$7").is_err());
        assert!(parse_auth_header("deadbeef$notanid").is_err());
    }
}
