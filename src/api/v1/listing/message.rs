use crate::{POOL, methods, model};
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct ListingMessageData {
    message: Option<String>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("listings" / i32 / "message")
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and_then(
            async move |listing_id: i32, message_data: ListingMessageData, auth: String| {
                let caller = match methods::tokens::authenticate(&auth).await {
                    Ok(token_row) => token_row,
                    Err(e) => return methods::tokens::auth_error_reply(e),
                };
                let Some(message_text) = message_data.message else {
                    return methods::standard_replies::bad_request("Message required");
                };

                let listing = match methods::listing::get_listing_by_id(listing_id).await {
                    Ok(listing) => listing,
                    Err(diesel::result::Error::NotFound) => {
                        return methods::standard_replies::not_found("Listing not found");
                    }
                    Err(_) => {
                        return methods::standard_replies::internal_server_error_response(
                            "listings/message: database error",
                        );
                    }
                };
                if listing.owner_id == caller.user_id {
                    return methods::standard_replies::bad_request(
                        "Cannot message your own listing",
                    );
                }

                let to_be_inserted = model::NewListingMessage {
                    listing_id,
                    from_user_id: caller.user_id,
                    to_user_id: listing.owner_id,
                    message: message_text,
                };
                let mut pool = POOL.get().unwrap();
                let insert_result = spawn_blocking(move || {
                    use crate::schema::listing_messages::dsl::*;
                    diesel::insert_into(listing_messages)
                        .values(&to_be_inserted)
                        .get_result::<model::ListingMessage>(&mut pool)
                })
                .await
                .unwrap();

                match insert_result {
                    Ok(row) => {
                        methods::notification::notify(
                            listing.owner_id,
                            model::NotificationKind::System,
                            format!("New message about your listing \"{}\"", listing.title),
                        );
                        methods::standard_replies::response_with_obj(row, StatusCode::CREATED)
                    }
                    Err(_) => methods::standard_replies::internal_server_error_response(
                        "listings/message: insert failed",
                    ),
                }
            },
        )
}
