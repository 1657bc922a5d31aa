use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rand::Rng;
use tokio::task::spawn_blocking;
use warp::Rejection;

use crate::model::{
    DisputeStatus, NewRental, NewRentalEvidence, NewRentalMessage, NewRentalReview,
    NewRentalStatusHistory, Rental, RentalStatus,
};
use crate::{POOL, methods};

#[derive(Debug)]
pub enum TransitionError {
    /// The requested move is not an edge of the status graph.
    InvalidTransition,
    /// The compare-and-swap on the current status lost to a concurrent
    /// transition; nothing was written.
    Conflict,
    Database(diesel::result::Error),
}

pub fn transition_error_reply(
    error: TransitionError,
) -> Result<(warp::reply::Response,), Rejection> {
    match error {
        TransitionError::InvalidTransition => {
            methods::standard_replies::bad_request("Invalid status transition")
        }
        TransitionError::Conflict => {
            methods::standard_replies::conflict("Rental was modified concurrently")
        }
        TransitionError::Database(e) => methods::standard_replies::internal_server_error_response(
            &format!("rental transition database error: {:?}", e),
        ),
    }
}

pub async fn generate_unique_rental_reference() -> String {
    // Allowed characters: digits 0-9 and uppercase A-Z.
    let charset: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    loop {
        let candidate: String = {
            let mut rng = rand::rng();
            (0..8)
                .map(|_| {
                    let idx = rng.random_range(0..charset.len());
                    charset[idx] as char
                })
                .collect()
        };

        let candidate_clone = candidate.clone();
        let exists_result = spawn_blocking(move || {
            let mut pool = POOL.get().unwrap();
            diesel::select(diesel::dsl::exists(
                crate::schema::rentals::table
                    .filter(crate::schema::rentals::reference.eq(&candidate_clone)),
            ))
            .get_result::<bool>(&mut pool)
        })
        .await;

        let exists = match exists_result {
            Ok(Ok(exists)) => exists,
            // Treat any error as a collision so we retry.
            Ok(Err(e)) => {
                eprintln!("Database error checking rental reference: {:?}", e);
                true
            }
            Err(join_err) => {
                eprintln!("Error joining blocking task: {:?}", join_err);
                true
            }
        };

        if !exists {
            return candidate;
        }
    }
}

pub async fn get_rental_by_id(_rental_id: i32) -> QueryResult<Rental> {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        use crate::schema::rentals::dsl::*;
        rentals
            .filter(id.eq(&_rental_id))
            .get_result::<Rental>(&mut pool)
    })
    .await
    .unwrap()
}

/// Insert the rental and its first `pending` history row together, so
/// the status == last-history-entry invariant holds from creation on.
pub async fn create_rental(new_rental: NewRental) -> QueryResult<Rental> {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        pool.transaction(|conn| {
            let rental = diesel::insert_into(crate::schema::rentals::table)
                .values(&new_rental)
                .get_result::<Rental>(conn)?;
            let first_entry = NewRentalStatusHistory {
                rental_id: rental.id,
                status: rental.status,
                changed_by: rental.renter_id,
                note: None,
            };
            diesel::insert_into(crate::schema::rental_status_history::table)
                .values(&first_entry)
                .execute(conn)?;
            Ok(rental)
        })
    })
    .await
    .unwrap()
}

/// Move a rental along the status graph. The UPDATE is guarded by the
/// status the caller read (`WHERE status = old`), and the history row
/// goes in the same transaction; a lost race surfaces as `Conflict`
/// with no rows written.
pub async fn transition(
    rental: &Rental,
    next: RentalStatus,
    _changed_by: i32,
    _note: Option<String>,
) -> Result<Rental, TransitionError> {
    if !rental.status.can_transition_to(next) {
        return Err(TransitionError::InvalidTransition);
    }
    let rental_id = rental.id;
    let previous = rental.status;
    let mut pool = POOL.get().unwrap();
    let result = spawn_blocking(move || {
        pool.transaction(|conn| {
            use crate::schema::rentals::dsl::*;
            let updated = diesel::update(
                rentals.filter(id.eq(rental_id)).filter(status.eq(previous)),
            )
            .set((status.eq(next), updated_at.eq(diesel::dsl::now)))
            .get_result::<Rental>(conn)?;
            let entry = NewRentalStatusHistory {
                rental_id,
                status: next,
                changed_by: _changed_by,
                note: _note,
            };
            diesel::insert_into(crate::schema::rental_status_history::table)
                .values(&entry)
                .execute(conn)?;
            Ok(updated)
        })
    })
    .await
    .unwrap();

    result.map_err(|e| match e {
        diesel::result::Error::NotFound => TransitionError::Conflict,
        other => TransitionError::Database(other),
    })
}

/// Overwrites any prior (resolved) dispute and forces the rental into
/// `disputed`, all behind the same status guard as `transition`.
pub async fn raise_dispute(
    rental: &Rental,
    _raised_by: i32,
    reason: String,
    evidence_url: Option<String>,
) -> Result<Rental, TransitionError> {
    if !rental.status.allows_dispute() {
        return Err(TransitionError::InvalidTransition);
    }
    let rental_id = rental.id;
    let previous = rental.status;
    let mut pool = POOL.get().unwrap();
    let result = spawn_blocking(move || {
        pool.transaction(|conn| {
            use crate::schema::rentals::dsl::*;
            let updated = diesel::update(
                rentals.filter(id.eq(rental_id)).filter(status.eq(previous)),
            )
            .set((
                status.eq(RentalStatus::Disputed),
                dispute_raised_by.eq(Some(_raised_by)),
                dispute_reason.eq(Some(reason)),
                dispute_evidence_url.eq(evidence_url),
                dispute_status.eq(Some(DisputeStatus::Open)),
                dispute_resolution.eq(None::<String>),
                dispute_resolved_by.eq(None::<i32>),
                dispute_raised_at.eq(Some(Utc::now())),
                dispute_resolved_at.eq(None::<DateTime<Utc>>),
                updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<Rental>(conn)?;
            let entry = NewRentalStatusHistory {
                rental_id,
                status: RentalStatus::Disputed,
                changed_by: _raised_by,
                note: None,
            };
            diesel::insert_into(crate::schema::rental_status_history::table)
                .values(&entry)
                .execute(conn)?;
            Ok(updated)
        })
    })
    .await
    .unwrap();

    result.map_err(|e| match e {
        diesel::result::Error::NotFound => TransitionError::Conflict,
        other => TransitionError::Database(other),
    })
}

/// Resolution is the one path out of `disputed`: a `resolved` verdict
/// completes the rental, a `rejected` one cancels it. The admin's
/// resolution text doubles as the history note.
pub async fn resolve_dispute(
    rental: &Rental,
    _resolved_by: i32,
    verdict: DisputeStatus,
    resolution: String,
) -> Result<Rental, TransitionError> {
    if verdict == DisputeStatus::Open {
        return Err(TransitionError::InvalidTransition);
    }
    let next = match verdict {
        DisputeStatus::Resolved => RentalStatus::Completed,
        _ => RentalStatus::Cancelled,
    };
    let rental_id = rental.id;
    let mut pool = POOL.get().unwrap();
    let note = resolution.clone();
    let result = spawn_blocking(move || {
        pool.transaction(|conn| {
            use crate::schema::rentals::dsl::*;
            let updated = diesel::update(
                rentals
                    .filter(id.eq(rental_id))
                    .filter(status.eq(RentalStatus::Disputed))
                    .filter(dispute_status.eq(Some(DisputeStatus::Open))),
            )
            .set((
                status.eq(next),
                dispute_status.eq(Some(verdict)),
                dispute_resolution.eq(Some(resolution)),
                dispute_resolved_by.eq(Some(_resolved_by)),
                dispute_resolved_at.eq(Some(Utc::now())),
                updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<Rental>(conn)?;
            let entry = NewRentalStatusHistory {
                rental_id,
                status: next,
                changed_by: _resolved_by,
                note: Some(note),
            };
            diesel::insert_into(crate::schema::rental_status_history::table)
                .values(&entry)
                .execute(conn)?;
            Ok(updated)
        })
    })
    .await
    .unwrap();

    result.map_err(|e| match e {
        diesel::result::Error::NotFound => TransitionError::Conflict,
        other => TransitionError::Database(other),
    })
}

/// Message and evidence appends are plain INSERTs into child tables,
/// done in one transaction when both are present.
pub async fn append_message_and_evidence(
    _rental_id: i32,
    _from_user_id: i32,
    message_text: Option<String>,
    evidence_url: Option<String>,
) -> QueryResult<Rental> {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        pool.transaction(|conn| {
            if let Some(text) = message_text {
                let row = NewRentalMessage {
                    rental_id: _rental_id,
                    from_user_id: _from_user_id,
                    message: text,
                };
                diesel::insert_into(crate::schema::rental_messages::table)
                    .values(&row)
                    .execute(conn)?;
            }
            if let Some(url_text) = evidence_url {
                let row = NewRentalEvidence {
                    rental_id: _rental_id,
                    url: url_text,
                    uploaded_by: _from_user_id,
                };
                diesel::insert_into(crate::schema::rental_evidence::table)
                    .values(&row)
                    .execute(conn)?;
            }
            use crate::schema::rentals::dsl::*;
            diesel::update(rentals.find(_rental_id))
                .set(updated_at.eq(diesel::dsl::now))
                .get_result::<Rental>(conn)
        })
    })
    .await
    .unwrap()
}

/// The payment sub-record is overwritten wholesale; there is no payment
/// history.
pub async fn set_payment(
    _rental_id: i32,
    amount: f64,
    method: String,
    reference_text: String,
    paid_at: Option<DateTime<Utc>>,
) -> QueryResult<Rental> {
    let mut pool = POOL.get().unwrap();
    let effective_paid_at = paid_at.unwrap_or_else(Utc::now);
    spawn_blocking(move || {
        use crate::schema::rentals::dsl::*;
        diesel::update(rentals.find(_rental_id))
            .set((
                payment_amount.eq(Some(amount)),
                payment_method.eq(Some(method)),
                payment_reference.eq(Some(reference_text)),
                payment_paid_at.eq(Some(effective_paid_at)),
                updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<Rental>(&mut pool)
    })
    .await
    .unwrap()
}

pub async fn has_review_by(_rental_id: i32, _user_id: i32) -> QueryResult<bool> {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        use crate::schema::rental_reviews::dsl::*;
        diesel::select(diesel::dsl::exists(
            rental_reviews
                .filter(rental_id.eq(_rental_id))
                .filter(by_user_id.eq(_user_id)),
        ))
        .get_result::<bool>(&mut pool)
    })
    .await
    .unwrap()
}

pub async fn append_review(review: NewRentalReview) -> QueryResult<Rental> {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        pool.transaction(|conn| {
            let _rental_id = review.rental_id;
            diesel::insert_into(crate::schema::rental_reviews::table)
                .values(&review)
                .execute(conn)?;
            use crate::schema::rentals::dsl::*;
            diesel::update(rentals.find(_rental_id))
                .set(updated_at.eq(diesel::dsl::now))
                .get_result::<Rental>(conn)
        })
    })
    .await
    .unwrap()
}

/// Rentals where the user is owner or renter, newest first.
pub async fn rentals_for_user(_user_id: i32) -> QueryResult<Vec<Rental>> {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        use crate::schema::rentals::dsl::*;
        rentals
            .filter(owner_id.eq(_user_id).or(renter_id.eq(_user_id)))
            .order(created_at.desc())
            .get_results::<Rental>(&mut pool)
    })
    .await
    .unwrap()
}

pub async fn open_disputes() -> QueryResult<Vec<Rental>> {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        use crate::schema::rentals::dsl::*;
        rentals
            .filter(dispute_status.eq(Some(DisputeStatus::Open)))
            .order(dispute_raised_at.desc())
            .get_results::<Rental>(&mut pool)
    })
    .await
    .unwrap()
}
