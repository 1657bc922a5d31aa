//! Audit export: one rental projected into JSON, a flattened CSV row,
//! or a print-ready text document. All three read from the same
//! `RentalAudit` projection so the formats cannot drift apart.

use currency_rs::Currency;
use diesel::prelude::*;
use tokio::task::spawn_blocking;

use crate::POOL;
use crate::helper_model::{
    AuditDispute, AuditEvidenceEntry, AuditMessageEntry, AuditPayment, AuditReviewEntry,
    AuditStatusEntry, RentalAudit,
};
use crate::model::{
    Listing, Rental, RentalEvidence, RentalMessage, RentalReview, RentalStatusHistory, User,
};

pub async fn load_rental_audit(_rental_id: i32) -> QueryResult<RentalAudit> {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        use crate::schema::listings::dsl as listing_q;
        use crate::schema::rental_evidence::dsl as evidence_q;
        use crate::schema::rental_messages::dsl as message_q;
        use crate::schema::rental_reviews::dsl as review_q;
        use crate::schema::rental_status_history::dsl as history_q;
        use crate::schema::rentals::dsl as rental_q;
        use crate::schema::users::dsl as user_q;

        let rental = rental_q::rentals
            .filter(rental_q::id.eq(&_rental_id))
            .get_result::<Rental>(&mut pool)?;
        let listing = listing_q::listings
            .find(rental.listing_id)
            .get_result::<Listing>(&mut pool)?;
        let owner = user_q::users
            .find(rental.owner_id)
            .get_result::<User>(&mut pool)?;
        let renter = user_q::users
            .find(rental.renter_id)
            .get_result::<User>(&mut pool)?;

        let history = history_q::rental_status_history
            .filter(history_q::rental_id.eq(&_rental_id))
            .order(history_q::id.asc())
            .load::<RentalStatusHistory>(&mut pool)?;
        let messages = message_q::rental_messages
            .filter(message_q::rental_id.eq(&_rental_id))
            .order(message_q::id.asc())
            .load::<RentalMessage>(&mut pool)?;
        let evidence = evidence_q::rental_evidence
            .filter(evidence_q::rental_id.eq(&_rental_id))
            .order(evidence_q::id.asc())
            .load::<RentalEvidence>(&mut pool)?;
        let reviews = review_q::rental_reviews
            .filter(review_q::rental_id.eq(&_rental_id))
            .order(review_q::id.asc())
            .load::<RentalReview>(&mut pool)?;

        Ok(build_audit(
            rental, listing, owner, renter, history, messages, evidence, reviews,
        ))
    })
    .await
    .unwrap()
}

fn build_audit(
    rental: Rental,
    listing: Listing,
    owner: User,
    renter: User,
    history: Vec<RentalStatusHistory>,
    messages: Vec<RentalMessage>,
    evidence: Vec<RentalEvidence>,
    reviews: Vec<RentalReview>,
) -> RentalAudit {
    // Payment columns are written together; a partial group means none.
    let payment = match (
        rental.payment_amount,
        rental.payment_method.clone(),
        rental.payment_reference.clone(),
        rental.payment_paid_at,
    ) {
        (Some(amount), Some(method), Some(reference), Some(paid_at)) => Some(AuditPayment {
            amount,
            method,
            reference,
            paid_at,
        }),
        _ => None,
    };

    let dispute = match (
        rental.dispute_status,
        rental.dispute_raised_by,
        rental.dispute_reason.clone(),
        rental.dispute_raised_at,
    ) {
        (Some(status), Some(raised_by), Some(reason), Some(raised_at)) => Some(AuditDispute {
            raised_by,
            reason,
            evidence_url: rental.dispute_evidence_url.clone(),
            status,
            resolution: rental.dispute_resolution.clone(),
            resolved_by: rental.dispute_resolved_by,
            raised_at,
            resolved_at: rental.dispute_resolved_at,
        }),
        _ => None,
    };

    RentalAudit {
        reference: rental.reference,
        status: rental.status,
        listing_title: listing.title,
        owner_name: owner.name,
        renter_name: renter.name,
        start_date: rental.start_date,
        end_date: rental.end_date,
        created_at: rental.created_at,
        updated_at: rental.updated_at,
        payment,
        dispute,
        status_history: history
            .into_iter()
            .map(|entry| AuditStatusEntry {
                status: entry.status,
                changed_by: entry.changed_by,
                note: entry.note,
                at: entry.created_at,
            })
            .collect(),
        messages: messages
            .into_iter()
            .map(|entry| AuditMessageEntry {
                from: entry.from_user_id,
                message: entry.message,
                at: entry.created_at,
            })
            .collect(),
        evidence: evidence
            .into_iter()
            .map(|entry| AuditEvidenceEntry {
                url: entry.url,
                uploaded_by: entry.uploaded_by,
                at: entry.created_at,
            })
            .collect(),
        reviews: reviews
            .into_iter()
            .map(|entry| AuditReviewEntry {
                by: entry.by_user_id,
                rating: entry.rating,
                comment: entry.comment,
                at: entry.created_at,
            })
            .collect(),
    }
}

pub fn render_json(audit: &RentalAudit) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(audit)
}

/// One flattened row; the append-only sequences ride along as
/// JSON-encoded cells.
pub fn render_csv(audit: &RentalAudit) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "reference",
        "status",
        "listing",
        "owner",
        "renter",
        "start_date",
        "end_date",
        "created_at",
        "updated_at",
        "payment_amount",
        "payment_method",
        "payment_reference",
        "payment_paid_at",
        "status_history",
        "messages",
        "evidence",
        "reviews",
        "dispute",
    ])?;

    let (payment_amount, payment_method, payment_reference, payment_paid_at) =
        match &audit.payment {
            Some(payment) => (
                format!("{:.2}", payment.amount),
                payment.method.clone(),
                payment.reference.clone(),
                payment.paid_at.to_rfc3339(),
            ),
            None => (String::new(), String::new(), String::new(), String::new()),
        };

    writer.write_record([
        audit.reference.clone(),
        audit.status.as_str().to_string(),
        audit.listing_title.clone(),
        audit.owner_name.clone(),
        audit.renter_name.clone(),
        audit.start_date.to_string(),
        audit.end_date.to_string(),
        audit.created_at.to_rfc3339(),
        audit.updated_at.to_rfc3339(),
        payment_amount,
        payment_method,
        payment_reference,
        payment_paid_at,
        serde_json::to_string(&audit.status_history)?,
        serde_json::to_string(&audit.messages)?,
        serde_json::to_string(&audit.evidence)?,
        serde_json::to_string(&audit.reviews)?,
        serde_json::to_string(&audit.dispute)?,
    ])?;

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("csv buffer flush failed: {}", e))
}

/// The print layout. Everything the JSON carries, sections in audit
/// order, amounts formatted as money.
pub fn render_document(audit: &RentalAudit) -> String {
    let mut doc = String::new();
    let rule = "=".repeat(62);

    doc.push_str(&rule);
    doc.push_str("\n                    NKADIME RENTAL AUDIT\n");
    doc.push_str(&rule);
    doc.push('\n');
    doc.push_str(&format!("Reference:  {}\n", audit.reference));
    doc.push_str(&format!("Status:     {}\n", audit.status.as_str()));
    doc.push_str(&format!("Listing:    {}\n", audit.listing_title));
    doc.push_str(&format!("Owner:      {}\n", audit.owner_name));
    doc.push_str(&format!("Renter:     {}\n", audit.renter_name));
    doc.push_str(&format!(
        "Period:     {} to {}\n",
        audit.start_date, audit.end_date
    ));
    doc.push_str(&format!(
        "Created:    {}\n",
        audit.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    doc.push_str(&format!(
        "Updated:    {}\n",
        audit.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    doc.push_str("\nPAYMENT\n");
    match &audit.payment {
        Some(payment) => {
            doc.push_str(&format!(
                "  Amount:    {}\n",
                Currency::new_float(payment.amount, None).format()
            ));
            doc.push_str(&format!("  Method:    {}\n", payment.method));
            doc.push_str(&format!("  Reference: {}\n", payment.reference));
            doc.push_str(&format!(
                "  Paid at:   {}\n",
                payment.paid_at.format("%Y-%m-%d %H:%M UTC")
            ));
        }
        None => doc.push_str("  No payment recorded.\n"),
    }

    doc.push_str("\nDISPUTE\n");
    match &audit.dispute {
        Some(dispute) => {
            doc.push_str(&format!("  Status:    {}\n", dispute.status.as_str()));
            doc.push_str(&format!("  Raised by: user {}\n", dispute.raised_by));
            doc.push_str(&format!("  Reason:    {}\n", dispute.reason));
            if let Some(url) = &dispute.evidence_url {
                doc.push_str(&format!("  Evidence:  {}\n", url));
            }
            if let Some(resolution) = &dispute.resolution {
                doc.push_str(&format!("  Resolution: {}\n", resolution));
            }
            if let Some(resolved_by) = dispute.resolved_by {
                doc.push_str(&format!("  Resolved by: user {}\n", resolved_by));
            }
        }
        None => doc.push_str("  No dispute recorded.\n"),
    }

    doc.push_str(&format!(
        "\nSTATUS HISTORY ({})\n",
        audit.status_history.len()
    ));
    for (index, entry) in audit.status_history.iter().enumerate() {
        doc.push_str(&format!(
            "  {}. {}  {:<12} by user {}\n",
            index + 1,
            entry.at.format("%Y-%m-%d %H:%M UTC"),
            entry.status.as_str(),
            entry.changed_by
        ));
        if let Some(note) = &entry.note {
            doc.push_str(&format!("     note: {}\n", note));
        }
    }

    doc.push_str(&format!("\nMESSAGES ({})\n", audit.messages.len()));
    for (index, entry) in audit.messages.iter().enumerate() {
        doc.push_str(&format!(
            "  {}. {}  user {}: {}\n",
            index + 1,
            entry.at.format("%Y-%m-%d %H:%M UTC"),
            entry.from,
            entry.message
        ));
    }

    doc.push_str(&format!("\nEVIDENCE ({})\n", audit.evidence.len()));
    for (index, entry) in audit.evidence.iter().enumerate() {
        doc.push_str(&format!(
            "  {}. {} (user {})\n",
            index + 1,
            entry.url,
            entry.uploaded_by
        ));
    }

    doc.push_str(&format!("\nREVIEWS ({})\n", audit.reviews.len()));
    for (index, entry) in audit.reviews.iter().enumerate() {
        match &entry.comment {
            Some(comment) => doc.push_str(&format!(
                "  {}. {}/5 by user {}: {}\n",
                index + 1,
                entry.rating,
                entry.by,
                comment
            )),
            None => doc.push_str(&format!(
                "  {}. {}/5 by user {}\n",
                index + 1,
                entry.rating,
                entry.by
            )),
        }
    }

    doc.push_str(&rule);
    doc.push('\n');
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper_model::{AuditMessageEntry, AuditPayment, AuditStatusEntry};
    use crate::model::RentalStatus;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample_audit() -> RentalAudit {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap();
        RentalAudit {
            reference: "7KQ2M9XA".to_string(),
            status: RentalStatus::Active,
            listing_title: "Concrete mixer".to_string(),
            owner_name: "Lesego".to_string(),
            renter_name: "Thabo".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            created_at: at,
            updated_at: at,
            payment: Some(AuditPayment {
                amount: 120.5,
                method: "card".to_string(),
                reference: "PAY-881".to_string(),
                paid_at: at,
            }),
            dispute: None,
            status_history: vec![
                AuditStatusEntry {
                    status: RentalStatus::Pending,
                    changed_by: 2,
                    note: None,
                    at,
                },
                AuditStatusEntry {
                    status: RentalStatus::Approved,
                    changed_by: 1,
                    note: Some("have fun".to_string()),
                    at,
                },
                AuditStatusEntry {
                    status: RentalStatus::Active,
                    changed_by: 2,
                    note: None,
                    at,
                },
            ],
            messages: vec![
                AuditMessageEntry {
                    from: 2,
                    message: "Picking it up at nine".to_string(),
                    at,
                },
                AuditMessageEntry {
                    from: 1,
                    message: "Works for me".to_string(),
                    at,
                },
            ],
            evidence: vec![],
            reviews: vec![],
        }
    }

    #[test]
    fn csv_is_one_row_matching_the_projection() {
        let audit = sample_audit();
        let bytes = render_csv(&audit).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);

        let row = &records[0];
        assert_eq!(&row[0], "7KQ2M9XA");
        assert_eq!(&row[1], "active");
        assert_eq!(&row[9], "120.50");

        let history: Vec<AuditStatusEntry> = serde_json::from_str(&row[13]).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].status, RentalStatus::Active);

        let messages: Vec<AuditMessageEntry> = serde_json::from_str(&row[14]).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].message, "Picking it up at nine");
    }

    #[test]
    fn all_three_formats_agree_on_the_same_state() {
        let audit = sample_audit();

        let json: serde_json::Value =
            serde_json::from_slice(&render_json(&audit).unwrap()).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
        assert_eq!(json["payment"]["amount"], 120.5);

        let bytes = render_csv(&audit).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[1], json["status"].as_str().unwrap());

        let doc = render_document(&audit);
        assert!(doc.contains("Status:     active"));
        assert!(doc.contains("MESSAGES (2)"));
        assert!(doc.contains("STATUS HISTORY (3)"));
        assert!(doc.contains("$120.50"));
    }

    #[test]
    fn document_handles_missing_payment_and_dispute() {
        let mut audit = sample_audit();
        audit.payment = None;
        let doc = render_document(&audit);
        assert!(doc.contains("No payment recorded."));
        assert!(doc.contains("No dispute recorded."));
    }
}
