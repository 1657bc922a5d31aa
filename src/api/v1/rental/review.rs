use crate::{methods, model};
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct RentalReviewData {
    rating: Option<i32>,
    comment: Option<String>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("rentals" / i32 / "review")
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and_then(
            async move |rental_id: i32, body: RentalReviewData, auth: String| {
                let caller = match methods::tokens::authenticate(&auth).await {
                    Ok(token_row) => token_row,
                    Err(e) => return methods::tokens::auth_error_reply(e),
                };
                let rating = match body.rating {
                    Some(rating) if (1..=5).contains(&rating) => rating,
                    _ => {
                        return methods::standard_replies::bad_request(
                            "Rating must be between 1 and 5",
                        );
                    }
                };

                let rental = match methods::rental::get_rental_by_id(rental_id).await {
                    Ok(rental) => rental,
                    Err(diesel::result::Error::NotFound) => {
                        return methods::standard_replies::not_found("Rental not found");
                    }
                    Err(_) => {
                        return methods::standard_replies::internal_server_error_response(
                            "rentals/review: database error",
                        );
                    }
                };
                if !rental.is_party(caller.user_id) {
                    return methods::standard_replies::forbidden(
                        "Only the rental parties may leave reviews",
                    );
                }

                match methods::rental::has_review_by(rental.id, caller.user_id).await {
                    Ok(true) => return methods::standard_replies::bad_request("Already reviewed"),
                    Ok(false) => {}
                    Err(_) => {
                        return methods::standard_replies::internal_server_error_response(
                            "rentals/review: duplicate check failed",
                        );
                    }
                }

                let review = model::NewRentalReview {
                    rental_id: rental.id,
                    by_user_id: caller.user_id,
                    rating,
                    comment: body.comment,
                };
                match methods::rental::append_review(review).await {
                    Ok(updated) => {
                        methods::standard_replies::response_with_obj(updated, StatusCode::OK)
                    }
                    Err(_) => methods::standard_replies::internal_server_error_response(
                        "rentals/review: insert failed",
                    ),
                }
            },
        )
}
