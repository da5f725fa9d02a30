//! Client-side form validation, kept free of UI and network concerns.
//!
//! Each validator takes the raw form values and either produces the payload
//! ready for the API or a list of per-field errors. Nothing here issues a
//! request: a form that fails validation never reaches the network.

use chrono::NaiveDateTime;

use crate::models::{ContactMessage, NewBooking, RegisterRequest};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Datetime formats accepted from form input.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Seconds in a charged rental day.
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

fn err(field: &'static str, message: impl Into<String>) -> FieldError {
    FieldError {
        field,
        message: message.into(),
    }
}

pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

/// Whole days charged for a rental span, any partial day rounding up.
pub fn rental_days(pickup: NaiveDateTime, ret: NaiveDateTime) -> i64 {
    let seconds = (ret - pickup).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}

/// Total price in whole cents precision.
pub fn total_price(days: i64, daily_rate: f64) -> f64 {
    (days as f64 * daily_rate * 100.0).round() / 100.0
}

// ============================================================================
// Booking
// ============================================================================

/// Raw values of the booking form.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub car_id: Option<i64>,
    pub daily_rate: f64,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_datetime: String,
    pub return_datetime: String,
}

/// Validate the booking form against `now`. On success the payload carries
/// the computed total for the rental span.
pub fn validate_booking(form: &BookingForm, now: NaiveDateTime) -> Result<NewBooking, Vec<FieldError>> {
    let mut errors = Vec::new();

    let car_id = match form.car_id {
        Some(id) => id,
        None => {
            errors.push(err("car_id", "Please select a car first"));
            0
        }
    };

    if form.pickup_location.trim().is_empty() {
        errors.push(err("pickup_location", "Pickup location is required"));
    }
    if form.dropoff_location.trim().is_empty() {
        errors.push(err("dropoff_location", "Drop-off location is required"));
    }

    let pickup = parse_datetime(&form.pickup_datetime);
    let ret = parse_datetime(&form.return_datetime);

    if pickup.is_none() {
        errors.push(err("pickup_datetime", "Pickup date is required (YYYY-MM-DDTHH:MM)"));
    }
    if ret.is_none() {
        errors.push(err("return_datetime", "Return date is required (YYYY-MM-DDTHH:MM)"));
    }

    let mut days = 0;
    if let (Some(pickup), Some(ret)) = (pickup, ret) {
        if pickup < now {
            errors.push(err("pickup_datetime", "Pickup date cannot be in the past"));
        }
        if ret <= pickup {
            errors.push(err("return_datetime", "Return date must be after pickup date"));
        } else {
            days = rental_days(pickup, ret);
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewBooking {
        car_id,
        pickup_location: form.pickup_location.trim().to_string(),
        dropoff_location: form.dropoff_location.trim().to_string(),
        pickup_datetime: form.pickup_datetime.trim().to_string(),
        return_datetime: form.return_datetime.trim().to_string(),
        total_price: total_price(days, form.daily_rate),
    })
}

// ============================================================================
// Contact
// ============================================================================

/// Raw values of the contact form.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

pub fn validate_contact(form: &ContactForm) -> Result<ContactMessage, Vec<FieldError>> {
    let mut errors = Vec::new();

    if form.name.trim().is_empty() {
        errors.push(err("name", "Name is required"));
    }
    if form.email.trim().is_empty() || !form.email.contains('@') {
        errors.push(err("email", "A valid email address is required"));
    }
    if form.phone.trim().is_empty() {
        errors.push(err("phone", "Phone number is required"));
    }
    if form.message.trim().is_empty() {
        errors.push(err("message", "Message is required"));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ContactMessage {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        message: form.message.trim().to_string(),
    })
}

// ============================================================================
// Registration
// ============================================================================

/// Raw values of the registration form.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub username: String,
    pub address: String,
    pub password: String,
    pub confirm_password: String,
}

pub fn validate_registration(form: &RegisterForm) -> Result<RegisterRequest, Vec<FieldError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("first_name", &form.first_name),
        ("last_name", &form.last_name),
        ("email", &form.email),
        ("username", &form.username),
    ] {
        if value.trim().is_empty() {
            errors.push(err(field, "Please fill in all required fields"));
        }
    }

    if form.password.len() < MIN_PASSWORD_LEN {
        errors.push(err(
            "password",
            format!("Password must be at least {} characters long", MIN_PASSWORD_LEN),
        ));
    }
    if form.password != form.confirm_password {
        errors.push(err("confirm_password", "Passwords do not match"));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(RegisterRequest {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone_number: form.phone_number.trim().to_string(),
        username: form.username.trim().to_string(),
        address: form.address.trim().to_string(),
        password: form.password.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn valid_form() -> BookingForm {
        BookingForm {
            car_id: Some(7),
            daily_rate: 120.0,
            pickup_location: "Downtown".to_string(),
            dropoff_location: "Airport".to_string(),
            pickup_datetime: "2025-07-01T10:00".to_string(),
            return_datetime: "2025-07-04T10:00".to_string(),
        }
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert!(parse_datetime("2025-07-01T10:00").is_some());
        assert!(parse_datetime("2025-07-01T10:00:30").is_some());
        assert!(parse_datetime("2025-07-01 10:00").is_some());
        assert!(parse_datetime("July 1st").is_none());
        assert!(parse_datetime("").is_none());
    }

    #[test]
    fn test_rental_days_rounds_partial_days_up() {
        let pickup = dt(2025, 7, 1, 10, 0);
        assert_eq!(rental_days(pickup, dt(2025, 7, 4, 10, 0)), 3);
        assert_eq!(rental_days(pickup, dt(2025, 7, 4, 10, 1)), 4);
        assert_eq!(rental_days(pickup, dt(2025, 7, 1, 12, 0)), 1);
        assert_eq!(rental_days(pickup, pickup), 0);
    }

    #[test]
    fn test_valid_booking_computes_total() {
        let now = dt(2025, 6, 1, 0, 0);
        let booking = validate_booking(&valid_form(), now).unwrap();
        assert_eq!(booking.car_id, 7);
        assert_eq!(booking.total_price, 360.0);
    }

    #[test]
    fn test_return_before_pickup_is_rejected() {
        let now = dt(2025, 6, 1, 0, 0);
        let mut form = valid_form();
        form.pickup_datetime = "2025-07-04T10:00".to_string();
        form.return_datetime = "2025-07-01T10:00".to_string();

        let errors = validate_booking(&form, now).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.field == "return_datetime" && e.message.contains("after pickup")));
    }

    #[test]
    fn test_return_equal_to_pickup_is_rejected() {
        let now = dt(2025, 6, 1, 0, 0);
        let mut form = valid_form();
        form.return_datetime = form.pickup_datetime.clone();
        assert!(validate_booking(&form, now).is_err());
    }

    #[test]
    fn test_pickup_in_the_past_is_rejected() {
        let now = dt(2025, 8, 1, 0, 0);
        let errors = validate_booking(&valid_form(), now).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.field == "pickup_datetime" && e.message.contains("past")));
    }

    #[test]
    fn test_missing_car_and_locations_are_reported() {
        let now = dt(2025, 6, 1, 0, 0);
        let form = BookingForm::default();
        let errors = validate_booking(&form, now).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"car_id"));
        assert!(fields.contains(&"pickup_location"));
        assert!(fields.contains(&"dropoff_location"));
        assert!(fields.contains(&"pickup_datetime"));
        assert!(fields.contains(&"return_datetime"));
    }

    #[test]
    fn test_contact_requires_plausible_email() {
        let mut form = ContactForm {
            name: "Sam".to_string(),
            email: "sam.example.com".to_string(),
            phone: "555-0100".to_string(),
            message: "Hello".to_string(),
        };
        let errors = validate_contact(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");

        form.email = "sam@example.com".to_string();
        let message = validate_contact(&form).unwrap();
        assert_eq!(message.email, "sam@example.com");
    }

    #[test]
    fn test_registration_password_rules() {
        let mut form = RegisterForm {
            first_name: "Kay".to_string(),
            last_name: "Mercer".to_string(),
            email: "k@example.com".to_string(),
            phone_number: "555-0100".to_string(),
            username: "kmercer".to_string(),
            address: "1 Main St".to_string(),
            password: "short".to_string(),
            confirm_password: "short".to_string(),
        };
        let errors = validate_registration(&form).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "password"));

        form.password = "longenough".to_string();
        form.confirm_password = "different".to_string();
        let errors = validate_registration(&form).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "confirm_password"));

        form.confirm_password = "longenough".to_string();
        let request = validate_registration(&form).unwrap();
        assert_eq!(request.username, "kmercer");
    }
}
