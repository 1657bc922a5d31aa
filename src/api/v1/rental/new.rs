use crate::{methods, model};
use chrono::NaiveDate;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct NewRentalRequestBodyData {
    listing: Option<i32>,
    owner: Option<i32>,
    renter: Option<i32>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("rentals")
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and_then(async move |body: NewRentalRequestBodyData, auth: String| {
            let caller = match methods::tokens::authenticate(&auth).await {
                Ok(token_row) => token_row,
                Err(e) => return methods::tokens::auth_error_reply(e),
            };

            let (Some(listing_id), Some(owner_id), Some(renter_id), Some(start_date), Some(end_date)) = (
                body.listing,
                body.owner,
                body.renter,
                body.start_date,
                body.end_date,
            ) else {
                return methods::standard_replies::bad_request("Missing required rental fields");
            };

            if renter_id != caller.user_id {
                return methods::standard_replies::forbidden(
                    "Rental requests must be made by the renter",
                );
            }
            if owner_id == renter_id {
                return methods::standard_replies::bad_request("Owner and renter must differ");
            }
            if end_date < start_date {
                return methods::standard_replies::bad_request("End date precedes start date");
            }

            let listing = match methods::listing::get_listing_by_id(listing_id).await {
                Ok(listing) => listing,
                Err(diesel::result::Error::NotFound) => {
                    return methods::standard_replies::not_found("Listing not found");
                }
                Err(_) => {
                    return methods::standard_replies::internal_server_error_response(
                        "rentals/new: listing lookup failed",
                    );
                }
            };
            if listing.owner_id != owner_id {
                return methods::standard_replies::bad_request("Owner does not match listing");
            }
            if !listing.available {
                return methods::standard_replies::conflict("Listing unavailable");
            }

            let reference = methods::rental::generate_unique_rental_reference().await;
            let to_be_inserted = model::NewRental {
                reference,
                listing_id,
                owner_id,
                renter_id,
                status: model::RentalStatus::Pending,
                start_date,
                end_date,
            };

            let rental = match methods::rental::create_rental(to_be_inserted).await {
                Ok(rental) => rental,
                Err(_) => {
                    return methods::standard_replies::internal_server_error_response(
                        "rentals/new: insert failed",
                    );
                }
            };

            if let Err(e) = methods::listing::set_availability(listing.id, false).await {
                eprintln!("rentals/new: availability flip failed: {:?}", e);
            }
            methods::notification::notify(
                owner_id,
                model::NotificationKind::RentalRequest,
                format!(
                    "New rental request {} for \"{}\"",
                    rental.reference, listing.title
                ),
            );

            methods::standard_replies::response_with_obj(rental, StatusCode::CREATED)
        })
}
