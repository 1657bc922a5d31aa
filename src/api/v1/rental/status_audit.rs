use crate::{methods, model};
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct StatusAuditData {
    status: Option<String>,
    note: Option<String>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("rentals" / i32 / "status-audit")
        .and(warp::patch())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and_then(
            async move |rental_id: i32, body: StatusAuditData, auth: String| {
                let caller = match methods::tokens::authenticate(&auth).await {
                    Ok(token_row) => token_row,
                    Err(e) => return methods::tokens::auth_error_reply(e),
                };

                // Enum membership first: an unknown status string never
                // reaches the rental at all.
                let next = match body.status.as_deref().and_then(model::RentalStatus::parse) {
                    Some(next) => next,
                    None => return methods::standard_replies::bad_request("Invalid status"),
                };

                let rental = match methods::rental::get_rental_by_id(rental_id).await {
                    Ok(rental) => rental,
                    Err(diesel::result::Error::NotFound) => {
                        return methods::standard_replies::not_found("Rental not found");
                    }
                    Err(_) => {
                        return methods::standard_replies::internal_server_error_response(
                            "rentals/status-audit: database error",
                        );
                    }
                };
                if !rental.is_party(caller.user_id) {
                    return methods::standard_replies::forbidden(
                        "Only the rental parties may update status",
                    );
                }

                let updated =
                    match methods::rental::transition(&rental, next, caller.user_id, body.note)
                        .await
                    {
                        Ok(updated) => updated,
                        Err(e) => return methods::rental::transition_error_reply(e),
                    };

                // Declined and cancelled both free the listing again.
                if matches!(
                    next,
                    model::RentalStatus::Declined | model::RentalStatus::Cancelled
                ) {
                    if let Err(e) =
                        methods::listing::set_availability(updated.listing_id, true).await
                    {
                        eprintln!("rentals/status-audit: availability flip failed: {:?}", e);
                    }
                }
                if matches!(
                    next,
                    model::RentalStatus::Approved | model::RentalStatus::Declined
                ) {
                    methods::notification::notify(
                        updated.renter_id,
                        model::NotificationKind::RentalUpdate,
                        format!(
                            "Your rental request {} was {}",
                            updated.reference,
                            next.as_str()
                        ),
                    );
                }

                methods::standard_replies::response_with_obj(updated, StatusCode::OK)
            },
        )
}
