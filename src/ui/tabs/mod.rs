pub mod bookings;
pub mod cars;
pub mod contact;
pub mod dashboard;
pub mod favorites;
pub mod news;
