use crate::helper_model::RentalWithParties;
use crate::methods;
use std::collections::HashMap;
use warp::http::StatusCode;
use warp::{Filter, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("rentals" / "history" / i32)
        .and(warp::get())
        .and(warp::header::<String>("auth"))
        .and_then(async move |user_id: i32, auth: String| {
            let caller = match methods::tokens::authenticate(&auth).await {
                Ok(token_row) => token_row,
                Err(e) => return methods::tokens::auth_error_reply(e),
            };
            if caller.user_id != user_id {
                let is_admin = methods::user::get_user_by_id(caller.user_id)
                    .await
                    .map(|user| user.is_admin)
                    .unwrap_or(false);
                if !is_admin {
                    return methods::standard_replies::forbidden(
                        "You may only view your own rental history",
                    );
                }
            }

            let rentals = match methods::rental::rentals_for_user(user_id).await {
                Ok(rentals) => rentals,
                Err(_) => {
                    return methods::standard_replies::internal_server_error_response(
                        "rentals/history: database error",
                    );
                }
            };

            let mut listing_titles: HashMap<i32, String> = HashMap::new();
            let mut user_names: HashMap<i32, String> = HashMap::new();
            let mut history = Vec::with_capacity(rentals.len());
            for rental in rentals {
                if !listing_titles.contains_key(&rental.listing_id) {
                    match methods::listing::get_listing_by_id(rental.listing_id).await {
                        Ok(listing) => {
                            listing_titles.insert(rental.listing_id, listing.title);
                        }
                        Err(_) => {
                            return methods::standard_replies::internal_server_error_response(
                                "rentals/history: listing lookup failed",
                            );
                        }
                    }
                }
                for party in [rental.owner_id, rental.renter_id] {
                    if !user_names.contains_key(&party) {
                        match methods::user::get_user_by_id(party).await {
                            Ok(user) => {
                                user_names.insert(party, user.name);
                            }
                            Err(_) => {
                                return methods::standard_replies::internal_server_error_response(
                                    "rentals/history: user lookup failed",
                                );
                            }
                        }
                    }
                }
                let listing_title = listing_titles[&rental.listing_id].clone();
                let owner_name = user_names[&rental.owner_id].clone();
                let renter_name = user_names[&rental.renter_id].clone();
                history.push(RentalWithParties {
                    rental,
                    listing_title,
                    owner_name,
                    renter_name,
                });
            }

            methods::standard_replies::response_with_obj(history, StatusCode::OK)
        })
}
