use crate::{integration, methods, model};
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct DisputeData {
    reason: Option<String>,
    evidence_url: Option<String>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("rentals" / i32 / "dispute")
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and_then(async move |rental_id: i32, body: DisputeData, auth: String| {
            let caller = match methods::tokens::authenticate(&auth).await {
                Ok(token_row) => token_row,
                Err(e) => return methods::tokens::auth_error_reply(e),
            };

            let rental = match methods::rental::get_rental_by_id(rental_id).await {
                Ok(rental) => rental,
                Err(diesel::result::Error::NotFound) => {
                    return methods::standard_replies::not_found("Rental not found");
                }
                Err(_) => {
                    return methods::standard_replies::internal_server_error_response(
                        "rentals/dispute: database error",
                    );
                }
            };
            // Strangers get 403 before any body validation runs.
            if !rental.is_party(caller.user_id) {
                return methods::standard_replies::forbidden(
                    "Only the rental owner or renter may raise a dispute",
                );
            }
            let Some(reason) = body.reason else {
                return methods::standard_replies::bad_request("Dispute reason required");
            };

            let updated = match methods::rental::raise_dispute(
                &rental,
                caller.user_id,
                reason.clone(),
                body.evidence_url,
            )
            .await
            {
                Ok(updated) => updated,
                Err(e) => return methods::rental::transition_error_reply(e),
            };

            methods::notification::notify_admins(
                model::NotificationKind::Dispute,
                format!("Dispute raised on rental {}", updated.reference),
            );
            let counterparty = updated.counterparty_of(caller.user_id);
            integration::sendgrid_nkadime::email_user_best_effort(
                counterparty,
                format!("Dispute raised on rental {}", updated.reference),
                format!(
                    "A dispute has been raised on rental {}: {}\nAn administrator will review it shortly.",
                    updated.reference, reason
                ),
            );

            methods::standard_replies::response_with_obj(updated, StatusCode::OK)
        })
}
