//! Data models for the Rentaly API.
//!
//! This module contains the wire types exchanged with the backend:
//!
//! - `Car`, `CarFilters`, `SearchCriteria`: the rentable fleet and its filters
//! - `Booking`, `NewBooking`, `BookingStatus`: reservations
//! - `User`, `RegisterRequest`, `ProfileUpdate`, `LoginResponse`: accounts
//! - `NewsItem`, `ContactMessage`, `DashboardStats`: ancillary content

pub mod booking;
pub mod car;
pub mod contact;
pub mod news;
pub mod user;

pub use booking::{Booking, BookingStatus, NewBooking};
pub use car::{Car, CarFilters, SearchCriteria};
pub use contact::{ContactMessage, ContactReceipt};
pub use news::NewsItem;
pub use user::{DashboardStats, FavoriteAck, LoginResponse, ProfileUpdate, RegisterRequest, User};
