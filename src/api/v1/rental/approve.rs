use crate::{methods, model};
use warp::http::StatusCode;
use warp::{Filter, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("rentals" / i32 / "approve")
        .and(warp::patch())
        .and(warp::header::<String>("auth"))
        .and_then(async move |rental_id: i32, auth: String| {
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
                        "rentals/approve: database error",
                    );
                }
            };
            if rental.owner_id != caller.user_id {
                return methods::standard_replies::forbidden("Only the owner may approve a rental");
            }

            let updated = match methods::rental::transition(
                &rental,
                model::RentalStatus::Approved,
                caller.user_id,
                None,
            )
            .await
            {
                Ok(updated) => updated,
                Err(e) => return methods::rental::transition_error_reply(e),
            };

            // Approval keeps the listing unavailable.
            methods::notification::notify(
                updated.renter_id,
                model::NotificationKind::RentalUpdate,
                format!("Your rental request {} was approved", updated.reference),
            );

            methods::standard_replies::response_with_obj(updated, StatusCode::OK)
        })
}
