use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{AdminCredential, Booking, BookingStatus};

// ── Bookings ──

/// Returns the raw rusqlite error so callers can tell a reference collision
/// (UNIQUE constraint on ref_id) apart from the store being unavailable.
pub fn create_booking(conn: &Connection, booking: &Booking) -> rusqlite::Result<()> {
    let created_at = booking.created_at.format("%Y-%m-%d %H:%M:%S").to_string();

    conn.execute(
        "INSERT INTO bookings (id, ref_id, name, phone, service, date, fee, txn_id, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.id,
            booking.ref_id,
            booking.name,
            booking.phone,
            booking.service,
            booking.date,
            booking.fee,
            booking.txn_id,
            booking.status.as_str(),
            created_at,
        ],
    )?;
    Ok(())
}

pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

pub fn get_booking_by_reference(
    conn: &Connection,
    ref_id: &str,
) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, ref_id, name, phone, service, date, fee, txn_id, status, created_at
         FROM bookings WHERE ref_id = ?1",
        params![ref_id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, ref_id, name, phone, service, date, fee, txn_id, status, created_at
         FROM bookings WHERE id = ?1",
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    // created_at has second precision; rowid breaks same-second ties so the
    // ordering stays newest-first.
    let mut stmt = conn.prepare(
        "SELECT id, ref_id, name, phone, service, date, fee, txn_id, status, created_at
         FROM bookings ORDER BY created_at DESC, rowid DESC",
    )?;

    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: &BookingStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let ref_id: String = row.get(1)?;
    let name: String = row.get(2)?;
    let phone: String = row.get(3)?;
    let service: String = row.get(4)?;
    let date: String = row.get(5)?;
    let fee: Option<String> = row.get(6)?;
    let txn_id: Option<String> = row.get(7)?;
    let status_str: String = row.get(8)?;
    let created_at_str: String = row.get(9)?;

    let created_at = NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        ref_id,
        name,
        phone,
        service,
        date,
        fee,
        txn_id,
        status: BookingStatus::parse(&status_str),
        created_at,
    })
}

// ── Admin credentials ──

pub fn count_admins(conn: &Connection) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM admins", [], |row| row.get(0))?;
    Ok(count)
}

pub fn get_admin_by_username(
    conn: &Connection,
    username: &str,
) -> anyhow::Result<Option<AdminCredential>> {
    let result = conn.query_row(
        "SELECT username, password_hash, email, security_answer_hash
         FROM admins WHERE username = ?1",
        params![username],
        |row| {
            Ok(AdminCredential {
                username: row.get(0)?,
                password_hash: row.get(1)?,
                email: row.get(2)?,
                security_answer_hash: row.get(3)?,
            })
        },
    );

    match result {
        Ok(admin) => Ok(Some(admin)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Recovery identifies the admin by the (username, email) pair; a partial
/// match is treated the same as no match.
pub fn get_admin_by_identity(
    conn: &Connection,
    username: &str,
    email: &str,
) -> anyhow::Result<Option<AdminCredential>> {
    let result = conn.query_row(
        "SELECT username, password_hash, email, security_answer_hash
         FROM admins WHERE username = ?1 AND email = ?2",
        params![username, email],
        |row| {
            Ok(AdminCredential {
                username: row.get(0)?,
                password_hash: row.get(1)?,
                email: row.get(2)?,
                security_answer_hash: row.get(3)?,
            })
        },
    );

    match result {
        Ok(admin) => Ok(Some(admin)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_admin(conn: &Connection, admin: &AdminCredential) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO admins (username, password_hash, email, security_answer_hash)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            admin.username,
            admin.password_hash,
            admin.email,
            admin.security_answer_hash,
        ],
    )?;
    Ok(())
}

pub fn update_admin_password(
    conn: &Connection,
    username: &str,
    password_hash: &str,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE admins SET password_hash = ?1 WHERE username = ?2",
        params![password_hash, username],
    )?;
    Ok(count > 0)
}
