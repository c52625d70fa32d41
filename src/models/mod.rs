pub mod admin;
pub mod booking;

pub use admin::AdminCredential;
pub use booking::{Booking, BookingStatus};
