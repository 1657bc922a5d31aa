pub mod export;
pub mod listing;
pub mod notification;
pub mod rental;
pub mod standard_replies;
pub mod tokens;
pub mod user;
