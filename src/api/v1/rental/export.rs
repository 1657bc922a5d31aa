use crate::methods;
use serde_derive::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

#[derive(Deserialize, Serialize, Clone, Debug)]
struct ExportQuery {
    format: Option<String>,
}

fn file_reply(
    bytes: Vec<u8>,
    content_type: &str,
    filename: String,
) -> Result<(warp::reply::Response,), Rejection> {
    let response = warp::http::Response::builder()
        .status(StatusCode::OK)
        .header("content-type", content_type)
        .header(
            "content-disposition",
            format!("attachment; filename={}", filename),
        )
        .body(warp::hyper::Body::from(bytes))
        .unwrap();
    Ok::<_, Rejection>((response,))
}

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path!("rentals" / i32 / "export")
        .and(warp::get())
        .and(warp::query::<ExportQuery>())
        .and(warp::header::<String>("auth"))
        .and_then(async move |rental_id: i32, query: ExportQuery, auth: String| {
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
                        "rentals/export: database error",
                    );
                }
            };
            if !rental.is_party(caller.user_id) {
                let is_admin = methods::user::get_user_by_id(caller.user_id)
                    .await
                    .map(|user| user.is_admin)
                    .unwrap_or(false);
                if !is_admin {
                    return methods::standard_replies::forbidden(
                        "You may not export this rental",
                    );
                }
            }

            let audit = match methods::export::load_rental_audit(rental.id).await {
                Ok(audit) => audit,
                Err(_) => {
                    return methods::standard_replies::internal_server_error_response(
                        "rentals/export: audit load failed",
                    );
                }
            };

            match query.format.as_deref().unwrap_or("json") {
                "json" => match methods::export::render_json(&audit) {
                    Ok(bytes) => file_reply(
                        bytes,
                        "application/json",
                        format!("rental-{}-audit.json", audit.reference),
                    ),
                    Err(_) => methods::standard_replies::internal_server_error_response(
                        "rentals/export: json render failed",
                    ),
                },
                "csv" => match methods::export::render_csv(&audit) {
                    Ok(bytes) => file_reply(
                        bytes,
                        "text/csv",
                        format!("rental-{}-audit.csv", audit.reference),
                    ),
                    Err(_) => methods::standard_replies::internal_server_error_response(
                        "rentals/export: csv render failed",
                    ),
                },
                // The print layout; served as text, laid out like a
                // paginated document.
                "pdf" => file_reply(
                    methods::export::render_document(&audit).into_bytes(),
                    "text/plain; charset=utf-8",
                    format!("rental-{}-audit.txt", audit.reference),
                ),
                _ => methods::standard_replies::bad_request("Invalid export format"),
            }
        })
}
