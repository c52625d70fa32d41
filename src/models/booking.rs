use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Store-assigned id used for admin mutations, never for client lookups.
    pub id: String,
    pub ref_id: String,
    pub name: String,
    pub phone: String,
    pub service: String,
    pub date: String,
    pub fee: Option<String>,
    pub txn_id: Option<String>,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum BookingStatus {
    PendingVerification,
    Confirmed,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::PendingVerification => "Pending Verification",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Rejected => "Rejected",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "Confirmed" => BookingStatus::Confirmed,
            "Rejected" => BookingStatus::Rejected,
            _ => BookingStatus::PendingVerification,
        }
    }

    /// Strict parse for admin decisions; only a terminal status is a valid
    /// decision.
    pub fn decision(s: &str) -> Option<Self> {
        match s {
            "Confirmed" => Some(BookingStatus::Confirmed),
            "Rejected" => Some(BookingStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Rejected)
    }
}
