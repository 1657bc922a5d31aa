use chrono::{DateTime, NaiveDate, Utc};
use serde_derive::{Deserialize, Serialize};

use crate::model;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NkadimeError {
    TokenFormatError,
    InvalidToken,
    NotFound,
    DatabaseError,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RequestToken {
    pub user_id: i32,
    pub token: String,
}

/// A rental with the related entities a client needs for display.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RentalWithParties {
    pub rental: model::Rental,
    pub listing_title: String,
    pub owner_name: String,
    pub renter_name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FavoriteWithListing {
    pub favorite: model::Favorite,
    pub listing: model::Listing,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ReviewWithReviewer {
    pub review: model::Review,
    pub reviewer_name: String,
}

// Audit export projection. One rental, fully populated, sub-sequences
// in their original append order.

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AuditPayment {
    pub amount: f64,
    pub method: String,
    pub reference: String,
    pub paid_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AuditDispute {
    pub raised_by: i32,
    pub reason: String,
    pub evidence_url: Option<String>,
    pub status: model::DisputeStatus,
    pub resolution: Option<String>,
    pub resolved_by: Option<i32>,
    pub raised_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AuditStatusEntry {
    pub status: model::RentalStatus,
    pub changed_by: i32,
    pub note: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AuditMessageEntry {
    pub from: i32,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AuditEvidenceEntry {
    pub url: String,
    pub uploaded_by: i32,
    pub at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AuditReviewEntry {
    pub by: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RentalAudit {
    pub reference: String,
    pub status: model::RentalStatus,
    pub listing_title: String,
    pub owner_name: String,
    pub renter_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub payment: Option<AuditPayment>,
    pub dispute: Option<AuditDispute>,
    pub status_history: Vec<AuditStatusEntry>,
    pub messages: Vec<AuditMessageEntry>,
    pub evidence: Vec<AuditEvidenceEntry>,
    pub reviews: Vec<AuditReviewEntry>,
}
