use crate::methods;
use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct PaymentData {
    amount: Option<f64>,
    method: Option<String>,
    reference: Option<String>,
    paid_at: Option<DateTime<Utc>>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("rentals" / i32 / "payment")
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and_then(async move |rental_id: i32, body: PaymentData, auth: String| {
            let caller = match methods::tokens::authenticate(&auth).await {
                Ok(token_row) => token_row,
                Err(e) => return methods::tokens::auth_error_reply(e),
            };
            let (Some(amount), Some(method), Some(reference)) =
                (body.amount, body.method.clone(), body.reference.clone())
            else {
                return methods::standard_replies::bad_request("Missing payment fields");
            };

            let rental = match methods::rental::get_rental_by_id(rental_id).await {
                Ok(rental) => rental,
                Err(diesel::result::Error::NotFound) => {
                    return methods::standard_replies::not_found("Rental not found");
                }
                Err(_) => {
                    return methods::standard_replies::internal_server_error_response(
                        "rentals/payment: database error",
                    );
                }
            };
            if !rental.is_party(caller.user_id) {
                return methods::standard_replies::forbidden(
                    "Only the rental parties may record payments",
                );
            }

            let update_result =
                methods::rental::set_payment(rental.id, amount, method, reference, body.paid_at)
                    .await;

            match update_result {
                Ok(updated) => methods::standard_replies::response_with_obj(updated, StatusCode::OK),
                Err(_) => methods::standard_replies::internal_server_error_response(
                    "rentals/payment: update failed",
                ),
            }
        })
}
