use serde::{Deserialize, Serialize};

/// A rentable car as returned by the `/cars` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub car_type: Option<String>,
    pub seats: Option<i32>,
    pub doors: Option<i32>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub daily_rate: f64,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub availability_status: Option<String>,
    #[serde(default)]
    pub favorite_count: Option<i64>,
}

impl Car {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }

    /// Cars with no status reported are treated as available.
    pub fn is_available(&self) -> bool {
        self.availability_status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("available"))
            .unwrap_or(true)
    }
}

/// Filter criteria for the car listing endpoint.
///
/// Serialized as query parameters: empty values are dropped entirely and
/// multi-value filters are comma-joined. Building the query never mutates
/// the filter set itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarFilters {
    pub car_type: Vec<String>,
    pub seats: Vec<i32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub limit: Option<u32>,
}

impl CarFilters {
    pub fn is_empty(&self) -> bool {
        self.car_type.is_empty()
            && self.seats.is_empty()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.limit.is_none()
    }

    /// Query pairs for the GET /cars request. Keys whose value is empty or
    /// absent are omitted; multi-value keys join their values with commas.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        let types: Vec<&str> = self
            .car_type
            .iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();
        if !types.is_empty() {
            params.push(("car_type", types.join(",")));
        }

        if !self.seats.is_empty() {
            let joined = self
                .seats
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(",");
            params.push(("seats", joined));
        }

        if let Some(min) = self.min_price {
            params.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            params.push(("max_price", max.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }

        params
    }
}

/// Search criteria for POST /cars/search.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<i32>,
}

impl SearchCriteria {
    /// Copy of the criteria with empty-string fields demoted to absent, so
    /// they are dropped from the serialized body. The original is untouched.
    pub fn normalized(&self) -> SearchCriteria {
        fn prune(value: &Option<String>) -> Option<String> {
            value.as_deref().filter(|s| !s.trim().is_empty()).map(str::to_string)
        }

        SearchCriteria {
            pickup_location: prune(&self.pickup_location),
            pickup_date: prune(&self.pickup_date),
            return_date: prune(&self.return_date),
            car_type: prune(&self.car_type),
            seats: self.seats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_produce_no_query() {
        assert!(CarFilters::default().to_query().is_empty());
    }

    #[test]
    fn test_blank_values_are_dropped() {
        // A blank car_type must not appear in the query at all
        let filters = CarFilters {
            car_type: vec![String::new()],
            seats: vec![4],
            ..Default::default()
        };
        let query = filters.to_query();
        assert_eq!(query, vec![("seats", "4".to_string())]);
        assert!(!query.iter().any(|(k, _)| *k == "car_type"));
    }

    #[test]
    fn test_multi_value_filters_are_comma_joined() {
        let filters = CarFilters {
            car_type: vec!["SUV".to_string(), "Sedan".to_string()],
            seats: vec![4, 7],
            min_price: Some(50.0),
            max_price: Some(300.0),
            ..Default::default()
        };
        let query = filters.to_query();
        assert!(query.contains(&("car_type", "SUV,Sedan".to_string())));
        assert!(query.contains(&("seats", "4,7".to_string())));
        assert!(query.contains(&("min_price", "50".to_string())));
        assert!(query.contains(&("max_price", "300".to_string())));
    }

    #[test]
    fn test_building_query_does_not_mutate_filters() {
        let filters = CarFilters {
            car_type: vec![String::new(), "SUV".to_string()],
            seats: vec![4],
            ..Default::default()
        };
        let before = filters.clone();
        let _ = filters.to_query();
        assert_eq!(filters, before);
    }

    #[test]
    fn test_search_criteria_normalization_drops_blanks() {
        let criteria = SearchCriteria {
            pickup_location: Some("Airport".to_string()),
            pickup_date: Some("".to_string()),
            return_date: None,
            car_type: Some("  ".to_string()),
            seats: Some(4),
        };
        let normalized = criteria.normalized();
        assert_eq!(normalized.pickup_location.as_deref(), Some("Airport"));
        assert!(normalized.pickup_date.is_none());
        assert!(normalized.car_type.is_none());
        assert_eq!(normalized.seats, Some(4));

        // Caller's criteria unchanged
        assert_eq!(criteria.pickup_date.as_deref(), Some(""));

        let body = serde_json::to_value(&normalized).unwrap();
        assert!(body.get("pickup_date").is_none());
        assert!(body.get("car_type").is_none());
        assert_eq!(body["seats"], 4);
    }

    #[test]
    fn test_car_availability_defaults_to_available() {
        let json = r#"{"id": 3, "make": "Jeep", "model": "Renegade", "daily_rate": 265.0}"#;
        let car: Car = serde_json::from_str(json).unwrap();
        assert!(car.is_available());
        assert_eq!(car.display_name(), "Jeep Renegade");

        let json = r#"{"id": 3, "make": "Jeep", "model": "Renegade", "daily_rate": 265.0,
                       "availability_status": "maintenance"}"#;
        let car: Car = serde_json::from_str(json).unwrap();
        assert!(!car.is_available());
    }
}
