use crate::{integration, methods, model};
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct ResolveDisputeData {
    status: Option<String>,
    resolution: Option<String>,
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("rentals" / i32 / "dispute" / "resolve")
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and_then(
            async move |rental_id: i32, body: ResolveDisputeData, auth: String| {
                let caller = match methods::tokens::authenticate(&auth).await {
                    Ok(token_row) => token_row,
                    Err(e) => return methods::tokens::auth_error_reply(e),
                };
                let admin = match methods::user::get_user_by_id(caller.user_id).await {
                    Ok(user) => user,
                    Err(_) => {
                        return methods::standard_replies::internal_server_error_response(
                            "rentals/dispute/resolve: user lookup failed",
                        );
                    }
                };
                if !admin.is_admin {
                    return methods::standard_replies::forbidden(
                        "Administrator privileges required",
                    );
                }

                let rental = match methods::rental::get_rental_by_id(rental_id).await {
                    Ok(rental) => rental,
                    Err(diesel::result::Error::NotFound) => {
                        return methods::standard_replies::not_found("Rental not found");
                    }
                    Err(_) => {
                        return methods::standard_replies::internal_server_error_response(
                            "rentals/dispute/resolve: database error",
                        );
                    }
                };
                if !rental.dispute_is_open() {
                    return methods::standard_replies::conflict("No open dispute to resolve");
                }

                let verdict = match body.status.as_deref().and_then(model::DisputeStatus::parse) {
                    Some(model::DisputeStatus::Open) | None => {
                        return methods::standard_replies::bad_request("Invalid dispute status");
                    }
                    Some(verdict) => verdict,
                };
                let Some(resolution) = body.resolution else {
                    return methods::standard_replies::bad_request("Resolution required");
                };

                let updated = match methods::rental::resolve_dispute(
                    &rental,
                    caller.user_id,
                    verdict,
                    resolution.clone(),
                )
                .await
                {
                    Ok(updated) => updated,
                    Err(e) => return methods::rental::transition_error_reply(e),
                };

                let summary = format!(
                    "Dispute on rental {} was {}: {}",
                    updated.reference,
                    verdict.as_str(),
                    resolution
                );
                for party in [updated.owner_id, updated.renter_id] {
                    methods::notification::notify(
                        party,
                        model::NotificationKind::Dispute,
                        summary.clone(),
                    );
                    integration::sendgrid_nkadime::email_user_best_effort(
                        party,
                        format!("Dispute resolved on rental {}", updated.reference),
                        summary.clone(),
                    );
                }

                methods::standard_replies::response_with_obj(updated, StatusCode::OK)
            },
        )
}
