use chrono::Utc;
use rand::Rng;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus};

/// Fresh reference candidates tried against the store's uniqueness check
/// before creation gives up.
const MAX_REFERENCE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct BookingRequest {
    /// Client-supplied reference, honored as the first candidate only.
    pub ref_id: Option<String>,
    pub name: String,
    pub phone: String,
    pub service: String,
    pub date: String,
    pub fee: Option<String>,
    pub txn_id: String,
}

pub fn generate_reference() -> String {
    let n: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    format!("#{n}")
}

/// Validates and persists a new booking. Nothing is written unless every
/// check passes, so a rejected request leaves no partial record.
pub fn create_booking(conn: &Connection, req: &BookingRequest) -> Result<Booking, AppError> {
    let required = [&req.name, &req.phone, &req.service, &req.date];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(AppError::Validation("All fields required".to_string()));
    }
    if req.txn_id.trim().is_empty() {
        return Err(AppError::Validation(
            "Transaction reference required".to_string(),
        ));
    }

    let mut candidate = match req.ref_id.as_deref() {
        Some(r) if !r.trim().is_empty() => r.trim().to_string(),
        _ => generate_reference(),
    };

    for _ in 0..MAX_REFERENCE_ATTEMPTS {
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            ref_id: candidate.clone(),
            name: req.name.clone(),
            phone: req.phone.clone(),
            service: req.service.clone(),
            date: req.date.clone(),
            fee: req.fee.clone(),
            txn_id: Some(req.txn_id.clone()),
            status: BookingStatus::PendingVerification,
            created_at: Utc::now().naive_utc(),
        };

        match queries::create_booking(conn, &booking) {
            Ok(()) => return Ok(booking),
            Err(e) if queries::is_unique_violation(&e) => {
                tracing::warn!(reference = %candidate, "reference collision, regenerating");
                candidate = generate_reference();
            }
            Err(e) => return Err(AppError::Database(e)),
        }
    }

    Err(AppError::DuplicateReference)
}

/// Records an admin decision on a booking. Any state may move to any
/// decision unless reversal of a terminal status has been disabled.
pub fn decide(
    conn: &Connection,
    id: &str,
    status: &str,
    allow_reversal: bool,
) -> Result<(), AppError> {
    let decision = BookingStatus::decision(status)
        .ok_or_else(|| AppError::Validation(format!("invalid status: {status}")))?;

    let existing = queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if !allow_reversal && existing.status.is_terminal() {
        return Err(AppError::DecisionLocked(
            "Booking already decided".to_string(),
        ));
    }

    if !queries::update_booking_status(conn, id, &decision)? {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn request(txn: &str) -> BookingRequest {
        BookingRequest {
            ref_id: None,
            name: "Asha".to_string(),
            phone: "9990001111".to_string(),
            service: "Consultation".to_string(),
            date: "2024-05-01".to_string(),
            fee: Some("500".to_string()),
            txn_id: txn.to_string(),
        }
    }

    #[test]
    fn test_generate_reference_format() {
        for _ in 0..100 {
            let reference = generate_reference();
            assert!(reference.starts_with('#'));
            let digits = &reference[1..];
            assert_eq!(digits.len(), 6);
            let n: u32 = digits.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn test_create_starts_pending() {
        let conn = setup_db();
        let booking = create_booking(&conn, &request("UTR123456")).unwrap();
        assert_eq!(booking.status, BookingStatus::PendingVerification);
        assert_ne!(booking.id, booking.ref_id);
    }

    #[test]
    fn test_create_rejects_missing_field() {
        let conn = setup_db();
        let mut req = request("UTR123456");
        req.phone = "  ".to_string();
        let err = create_booking(&conn, &req).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Rejected before persistence
        assert!(queries::get_all_bookings(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_blank_transaction_reference() {
        let conn = setup_db();
        let err = create_booking(&conn, &request("   ")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(queries::get_all_bookings(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_collision_retries_with_fresh_reference() {
        let conn = setup_db();

        let mut first = request("UTR-1");
        first.ref_id = Some("#123456".to_string());
        let created = create_booking(&conn, &first).unwrap();
        assert_eq!(created.ref_id, "#123456");

        // Same supplied reference collides; a regenerated one lands.
        let mut second = request("UTR-2");
        second.ref_id = Some("#123456".to_string());
        let retried = create_booking(&conn, &second).unwrap();
        assert_ne!(retried.ref_id, "#123456");

        assert_eq!(queries::get_all_bookings(&conn).unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_reference_persists_exactly_one_row() {
        let conn = setup_db();
        let booking = create_booking(&conn, &request("UTR-1")).unwrap();

        let clone = Booking {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now().naive_utc(),
            ..booking.clone()
        };
        let err = queries::create_booking(&conn, &clone).unwrap_err();
        assert!(queries::is_unique_violation(&err));
        assert_eq!(queries::get_all_bookings(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_decide_overwrites_previous_decision() {
        let conn = setup_db();
        let booking = create_booking(&conn, &request("UTR-1")).unwrap();

        decide(&conn, &booking.id, "Confirmed", true).unwrap();
        let fetched = queries::get_booking_by_id(&conn, &booking.id)
            .unwrap()
            .unwrap();
        assert_eq!(fetched.status, BookingStatus::Confirmed);

        decide(&conn, &booking.id, "Rejected", true).unwrap();
        let fetched = queries::get_booking_by_id(&conn, &booking.id)
            .unwrap()
            .unwrap();
        assert_eq!(fetched.status, BookingStatus::Rejected);
    }

    #[test]
    fn test_decide_locked_once_terminal() {
        let conn = setup_db();
        let booking = create_booking(&conn, &request("UTR-1")).unwrap();

        decide(&conn, &booking.id, "Confirmed", false).unwrap();
        let err = decide(&conn, &booking.id, "Rejected", false).unwrap_err();
        assert!(matches!(err, AppError::DecisionLocked(_)));

        let fetched = queries::get_booking_by_id(&conn, &booking.id)
            .unwrap()
            .unwrap();
        assert_eq!(fetched.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_decide_rejects_non_decision_status() {
        let conn = setup_db();
        let booking = create_booking(&conn, &request("UTR-1")).unwrap();
        let err = decide(&conn, &booking.id, "Pending Verification", true).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_decide_unknown_id() {
        let conn = setup_db();
        let err = decide(&conn, "no-such-id", "Confirmed", true).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
