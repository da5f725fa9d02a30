use serde::{Deserialize, Serialize};

use super::Car;

/// Lifecycle state of a booking as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
            BookingStatus::Unknown => "unknown",
        }
    }

    /// Only bookings that have not yet run their course can be cancelled.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// A booking record, with its car embedded by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub car: Car,
    pub pickup_location: String,
    pub dropoff_location: String,
    // Datetimes stay as the backend's ISO strings; parsing happens at the
    // display and validation seams.
    pub pickup_datetime: String,
    pub return_datetime: String,
    pub total_price: f64,
    #[serde(alias = "status")]
    pub booking_status: BookingStatus,
}

/// Payload for creating a booking. The total is computed client-side from
/// the rental span and the car's daily rate before submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBooking {
    pub car_id: i64,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_datetime: String,
    pub return_datetime: String,
    pub total_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_booking_with_embedded_car() {
        let json = r#"{
            "id": 42,
            "car": {"id": 7, "make": "Toyota", "model": "RAV4", "daily_rate": 120.0,
                    "seats": 5, "car_type": "SUV"},
            "pickup_location": "Downtown",
            "dropoff_location": "Airport",
            "pickup_datetime": "2025-07-01T10:00:00",
            "return_datetime": "2025-07-04T10:00:00",
            "total_price": 360.0,
            "booking_status": "confirmed"
        }"#;

        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.id, 42);
        assert_eq!(booking.car.display_name(), "Toyota RAV4");
        assert_eq!(booking.booking_status, BookingStatus::Confirmed);
        assert!(booking.booking_status.is_cancellable());
    }

    #[test]
    fn test_status_field_alias() {
        // Some endpoints report the status under "status" instead
        let json = r#"{
            "id": 9,
            "car": {"id": 1, "make": "Kia", "model": "Sportage", "daily_rate": 88.0},
            "pickup_location": "A", "dropoff_location": "B",
            "pickup_datetime": "2025-07-01T10:00:00",
            "return_datetime": "2025-07-02T10:00:00",
            "total_price": 88.0,
            "status": "completed"
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.booking_status, BookingStatus::Completed);
        assert!(!booking.booking_status.is_cancellable());
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let status: BookingStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(status, BookingStatus::Unknown);
        assert!(!status.is_cancellable());
    }
}
