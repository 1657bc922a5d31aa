use crate::methods;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct RentalMessageData {
    message: Option<String>,
    evidence_url: Option<String>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("rentals" / i32 / "message")
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and_then(
            async move |rental_id: i32, body: RentalMessageData, auth: String| {
                let caller = match methods::tokens::authenticate(&auth).await {
                    Ok(token_row) => token_row,
                    Err(e) => return methods::tokens::auth_error_reply(e),
                };
                if body.message.is_none() && body.evidence_url.is_none() {
                    return methods::standard_replies::bad_request("Message or evidence required");
                }

                let rental = match methods::rental::get_rental_by_id(rental_id).await {
                    Ok(rental) => rental,
                    Err(diesel::result::Error::NotFound) => {
                        return methods::standard_replies::not_found("Rental not found");
                    }
                    Err(_) => {
                        return methods::standard_replies::internal_server_error_response(
                            "rentals/message: database error",
                        );
                    }
                };
                if !rental.is_party(caller.user_id) {
                    return methods::standard_replies::forbidden(
                        "Only the rental parties may post messages",
                    );
                }

                let append_result = methods::rental::append_message_and_evidence(
                    rental.id,
                    caller.user_id,
                    body.message,
                    body.evidence_url,
                )
                .await;

                match append_result {
                    Ok(updated) => {
                        methods::standard_replies::response_with_obj(updated, StatusCode::OK)
                    }
                    Err(_) => methods::standard_replies::internal_server_error_response(
                        "rentals/message: append failed",
                    ),
                }
            },
        )
}
