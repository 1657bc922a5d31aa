use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

// Diesel requires us to define a custom mapping between the Rust enum
// and the database type, if we are not using string.
use crate::schema::*;
use diesel::deserialize::{self, FromSql};
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, Output, ToSql};
use diesel::{AsExpression, FromSqlRow};
use std::io::Write;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::RentalStatusEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RentalStatus {
    Pending,
    Approved,
    Declined,
    Paid,
    Active,
    InProgress,
    Completed,
    Cancelled,
    Disputed,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::DisputeStatusEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DisputeStatus {
    Open,
    Resolved,
    Rejected,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::NotificationKindEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    RentalRequest,
    RentalUpdate,
    Dispute,
    System,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Pending => "pending",
            RentalStatus::Approved => "approved",
            RentalStatus::Declined => "declined",
            RentalStatus::Paid => "paid",
            RentalStatus::Active => "active",
            RentalStatus::InProgress => "in-progress",
            RentalStatus::Completed => "completed",
            RentalStatus::Cancelled => "cancelled",
            RentalStatus::Disputed => "disputed",
        }
    }

    pub fn parse(value: &str) -> Option<RentalStatus> {
        match value {
            "pending" => Some(RentalStatus::Pending),
            "approved" => Some(RentalStatus::Approved),
            "declined" => Some(RentalStatus::Declined),
            "paid" => Some(RentalStatus::Paid),
            "active" => Some(RentalStatus::Active),
            "in-progress" => Some(RentalStatus::InProgress),
            "completed" => Some(RentalStatus::Completed),
            "cancelled" => Some(RentalStatus::Cancelled),
            "disputed" => Some(RentalStatus::Disputed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RentalStatus::Declined | RentalStatus::Completed | RentalStatus::Cancelled
        )
    }

    /// Status graph for every ordinary transition. A `disputed` rental
    /// has no exits here; dispute resolution is the only way out.
    pub fn can_transition_to(&self, next: RentalStatus) -> bool {
        match self {
            RentalStatus::Pending => {
                matches!(next, RentalStatus::Approved | RentalStatus::Declined)
            }
            RentalStatus::Approved => matches!(
                next,
                RentalStatus::Paid
                    | RentalStatus::Active
                    | RentalStatus::InProgress
                    | RentalStatus::Cancelled
            ),
            RentalStatus::Paid | RentalStatus::Active | RentalStatus::InProgress => matches!(
                next,
                RentalStatus::Completed | RentalStatus::Disputed | RentalStatus::Cancelled
            ),
            RentalStatus::Disputed => false,
            RentalStatus::Declined | RentalStatus::Completed | RentalStatus::Cancelled => false,
        }
    }

    pub fn allows_dispute(&self) -> bool {
        self.can_transition_to(RentalStatus::Disputed)
    }
}

impl DisputeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisputeStatus::Open => "open",
            DisputeStatus::Resolved => "resolved",
            DisputeStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<DisputeStatus> {
        match value {
            "open" => Some(DisputeStatus::Open),
            "resolved" => Some(DisputeStatus::Resolved),
            "rejected" => Some(DisputeStatus::Rejected),
            _ => None,
        }
    }
}

//This is for postgres. For other databases the type might be different.
impl ToSql<sql_types::RentalStatusEnum, Pg> for RentalStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::RentalStatusEnum, Pg> for RentalStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let raw = std::str::from_utf8(bytes.as_bytes())?;
        RentalStatus::parse(raw).ok_or_else(|| "Unrecognized enum variant".into())
    }
}

impl ToSql<sql_types::DisputeStatusEnum, Pg> for DisputeStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::DisputeStatusEnum, Pg> for DisputeStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let raw = std::str::from_utf8(bytes.as_bytes())?;
        DisputeStatus::parse(raw).ok_or_else(|| "Unrecognized enum variant".into())
    }
}

impl ToSql<sql_types::NotificationKindEnum, Pg> for NotificationKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        match *self {
            NotificationKind::RentalRequest => out.write_all(b"rental-request")?,
            NotificationKind::RentalUpdate => out.write_all(b"rental-update")?,
            NotificationKind::Dispute => out.write_all(b"dispute")?,
            NotificationKind::System => out.write_all(b"system")?,
        }
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<sql_types::NotificationKindEnum, Pg> for NotificationKind {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"rental-request" => Ok(NotificationKind::RentalRequest),
            b"rental-update" => Ok(NotificationKind::RentalUpdate),
            b"dispute" => Ok(NotificationKind::Dispute),
            b"system" => Ok(NotificationKind::System),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String, // Hashed!
    pub phone: Option<String>,
    pub is_verified: bool,
    pub is_admin: bool,
    pub profile_pic: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_verified: bool,
    pub is_admin: bool,
    pub profile_pic: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn to_publish_user(&self) -> PublishUser {
        PublishUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            is_verified: self.is_verified,
            is_admin: self.is_admin,
            profile_pic: self.profile_pic.clone(),
            location: self.location.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Insertable, Debug, Clone, Deserialize, Serialize)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String, // Hash this before inserting!
    pub phone: Option<String>,
}

#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = users)]
pub struct UserChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = access_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccessToken {
    pub id: i32,
    pub user_id: i32,
    pub token: Vec<u8>,
    pub exp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishAccessToken {
    pub user_id: i32,
    pub token: String,
    pub exp: DateTime<Utc>,
}

impl AccessToken {
    pub fn to_publish_access_token(&self) -> PublishAccessToken {
        PublishAccessToken {
            user_id: self.user_id,
            token: hex::encode(&self.token),
            exp: self.exp,
        }
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = access_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccessToken {
    pub user_id: i32,
    pub token: Vec<u8>,
    pub exp: DateTime<Utc>,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Listing {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub images: Vec<String>,
    pub price: f64,
    pub price_unit: String,
    pub location: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, Deserialize, Serialize)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewListing {
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub images: Vec<String>,
    pub price: f64,
    pub price_unit: String,
    pub location: String,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = rentals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Rental {
    pub id: i32,
    pub reference: String,
    pub listing_id: i32,
    pub owner_id: i32,
    pub renter_id: i32,
    pub status: RentalStatus,
    pub payment_amount: Option<f64>,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub payment_paid_at: Option<DateTime<Utc>>,
    pub dispute_raised_by: Option<i32>,
    pub dispute_reason: Option<String>,
    pub dispute_evidence_url: Option<String>,
    pub dispute_status: Option<DisputeStatus>,
    pub dispute_resolution: Option<String>,
    pub dispute_resolved_by: Option<i32>,
    pub dispute_raised_at: Option<DateTime<Utc>>,
    pub dispute_resolved_at: Option<DateTime<Utc>>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rental {
    pub fn is_party(&self, user: i32) -> bool {
        self.owner_id == user || self.renter_id == user
    }

    pub fn counterparty_of(&self, user: i32) -> i32 {
        if self.owner_id == user {
            self.renter_id
        } else {
            self.owner_id
        }
    }

    pub fn dispute_is_open(&self) -> bool {
        matches!(self.dispute_status, Some(DisputeStatus::Open))
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = rentals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRental {
    pub reference: String,
    pub listing_id: i32,
    pub owner_id: i32,
    pub renter_id: i32,
    pub status: RentalStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = rental_status_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RentalStatusHistory {
    pub id: i32,
    pub rental_id: i32,
    pub status: RentalStatus,
    pub changed_by: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = rental_status_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRentalStatusHistory {
    pub rental_id: i32,
    pub status: RentalStatus,
    pub changed_by: i32,
    pub note: Option<String>,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = rental_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RentalMessage {
    pub id: i32,
    pub rental_id: i32,
    pub from_user_id: i32,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = rental_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRentalMessage {
    pub rental_id: i32,
    pub from_user_id: i32,
    pub message: String,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = rental_evidence)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RentalEvidence {
    pub id: i32,
    pub rental_id: i32,
    pub url: String,
    pub uploaded_by: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = rental_evidence)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRentalEvidence {
    pub rental_id: i32,
    pub url: String,
    pub uploaded_by: i32,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = rental_reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RentalReview {
    pub id: i32,
    pub rental_id: i32,
    pub by_user_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = rental_reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRentalReview {
    pub rental_id: i32,
    pub by_user_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewNotification {
    pub user_id: i32,
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = listing_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ListingMessage {
    pub id: i32,
    pub listing_id: i32,
    pub from_user_id: i32,
    pub to_user_id: i32,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = listing_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewListingMessage {
    pub listing_id: i32,
    pub from_user_id: i32,
    pub to_user_id: i32,
    pub message: String,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub listing_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewFavorite {
    pub user_id: i32,
    pub listing_id: i32,
}

#[derive(Queryable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Review {
    pub id: i32,
    pub listing_id: i32,
    pub reviewer_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewReview {
    pub listing_id: i32,
    pub reviewer_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_wire_names() {
        for status in [
            RentalStatus::Pending,
            RentalStatus::Approved,
            RentalStatus::Declined,
            RentalStatus::Paid,
            RentalStatus::Active,
            RentalStatus::InProgress,
            RentalStatus::Completed,
            RentalStatus::Cancelled,
            RentalStatus::Disputed,
        ] {
            assert_eq!(RentalStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RentalStatus::parse("banana"), None);
        assert_eq!(RentalStatus::parse("InProgress"), None);
    }

    #[test]
    fn pending_goes_to_approved_or_declined_only() {
        let pending = RentalStatus::Pending;
        assert!(pending.can_transition_to(RentalStatus::Approved));
        assert!(pending.can_transition_to(RentalStatus::Declined));
        assert!(!pending.can_transition_to(RentalStatus::Completed));
        assert!(!pending.can_transition_to(RentalStatus::Cancelled));
        assert!(!pending.can_transition_to(RentalStatus::Disputed));
        assert!(!pending.can_transition_to(RentalStatus::Pending));
    }

    #[test]
    fn in_flight_statuses_complete_dispute_or_cancel() {
        for status in [
            RentalStatus::Paid,
            RentalStatus::Active,
            RentalStatus::InProgress,
        ] {
            assert!(status.can_transition_to(RentalStatus::Completed));
            assert!(status.can_transition_to(RentalStatus::Disputed));
            assert!(status.can_transition_to(RentalStatus::Cancelled));
            assert!(!status.can_transition_to(RentalStatus::Approved));
            assert!(status.allows_dispute());
        }
    }

    #[test]
    fn terminal_statuses_have_no_exits() {
        for terminal in [
            RentalStatus::Declined,
            RentalStatus::Completed,
            RentalStatus::Cancelled,
        ] {
            assert!(terminal.is_terminal());
            for next in [
                RentalStatus::Pending,
                RentalStatus::Approved,
                RentalStatus::Paid,
                RentalStatus::Active,
                RentalStatus::Disputed,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn disputed_only_exits_through_resolution() {
        let disputed = RentalStatus::Disputed;
        assert!(!disputed.is_terminal());
        for next in [
            RentalStatus::Completed,
            RentalStatus::Cancelled,
            RentalStatus::Active,
        ] {
            assert!(!disputed.can_transition_to(next));
        }
    }

    #[test]
    fn dispute_not_allowed_before_handover() {
        assert!(!RentalStatus::Pending.allows_dispute());
        assert!(!RentalStatus::Approved.allows_dispute());
        assert!(!RentalStatus::Declined.allows_dispute());
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&RentalStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let back: RentalStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(back, RentalStatus::InProgress);
    }
}
