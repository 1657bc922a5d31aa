use crate::{POOL, methods, model};
use chrono::{NaiveTime, Utc};
use diesel::prelude::*;
use std::time::Duration;

pub async fn nightly_task() {
    loop {
        let now = Utc::now();
        let midnight = now
            .date_naive()
            .succ_opt()
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        let duration_until_midnight = (midnight - now.naive_utc())
            .to_std()
            .unwrap_or_else(|_| Duration::from_secs(1));

        tokio::time::sleep(duration_until_midnight).await;

        println!("====== Running Daily Tasks ======");

        let mut pool = POOL.get().unwrap();

        // Delete expired tokens
        let now = Utc::now();
        use crate::schema::access_tokens::dsl as at_q;
        if let Err(e) =
            diesel::delete(at_q::access_tokens.filter(at_q::exp.lt(now))).execute(&mut pool)
        {
            eprintln!("Failed to purge expired tokens: {:?}", e);
        }

        // Return-due reminders: rentals in the renter's hands past their
        // end date.
        let today = now.date_naive();
        use crate::schema::rentals::dsl as rental_q;
        let overdue = rental_q::rentals
            .filter(rental_q::status.eq_any(vec![
                model::RentalStatus::Paid,
                model::RentalStatus::Active,
                model::RentalStatus::InProgress,
            ]))
            .filter(rental_q::end_date.lt(today))
            .load::<model::Rental>(&mut pool);

        let Ok(overdue) = overdue else {
            eprintln!("Failed to load overdue rentals");
            continue;
        };

        for rental in overdue {
            methods::notification::notify(
                rental.renter_id,
                model::NotificationKind::RentalUpdate,
                format!(
                    "Rental {} passed its end date on {}; please arrange the return",
                    rental.reference, rental.end_date
                ),
            );
        }

        println!("===== Daily Tasks Completed =====");
    }
}
