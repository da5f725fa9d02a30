//! API client for communicating with the Rentaly REST backend.
//!
//! Every remote operation of the client goes through `ApiClient`. A single
//! request-building path attaches the JSON content type and, when a bearer
//! credential is currently stored, the authorization header; a single
//! response path maps non-2xx statuses and decode failures to `ApiError`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::models::{
    Booking, Car, CarFilters, ContactMessage, ContactReceipt, DashboardStats, FavoriteAck,
    LoginResponse, NewBooking, NewsItem, ProfileUpdate, RegisterRequest, SearchCriteria, User,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the hosted Rentaly backend; overridable via config or env.
pub const DEFAULT_API_BASE_URL: &str = "http://145.223.81.14:8000";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the Rentaly backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Credential to attach, if any. Read from the session store on every
    /// call so a login or logout elsewhere takes effect immediately; empty
    /// strings are treated as no credential.
    fn bearer_token(&self) -> Option<String> {
        self.session.token().filter(|t| !t.is_empty())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, self.url(path))
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = self.bearer_token() {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send a request and decode the JSON body of a 2xx response.
    /// `what` names the operation for logs and error context.
    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        what: &'static str,
    ) -> Result<T, ApiError> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(what, status = %status, "API request failed");
            return Err(ApiError::from_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(what, error = %e, "Failed to decode API response");
            ApiError::decode(what, e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, what: &'static str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path), what).await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &'static str,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path).query(query), what)
            .await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        what: &'static str,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, path).json(body), what)
            .await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        what: &'static str,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::PUT, path).json(body), what)
            .await
    }

    async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        what: &'static str,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::DELETE, path), what).await
    }

    // ===== Authentication =====

    /// Authenticate and store the returned credential in the session store.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = serde_json::json!({ "username": username, "password": password });
        let auth: LoginResponse = self.post("/users/login", &body, "log in").await?;
        self.session.set_token(&auth.access_token);
        Ok(auth)
    }

    /// Drop the stored credential. Purely local: no network call is made.
    pub fn logout(&self) {
        self.session.clear();
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        self.post("/users/register", request, "register").await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/users/me", "fetch account").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.put("/users/me", update, "update profile").await
    }

    // ===== Cars =====

    pub async fn list_cars(&self, filters: &CarFilters) -> Result<Vec<Car>, ApiError> {
        self.get_with_query("/cars", &filters.to_query(), "fetch cars")
            .await
    }

    pub async fn search_cars(&self, criteria: &SearchCriteria) -> Result<Vec<Car>, ApiError> {
        self.post("/cars/search", &criteria.normalized(), "search cars")
            .await
    }

    pub async fn car(&self, car_id: i64) -> Result<Car, ApiError> {
        self.get(&format!("/cars/{}", car_id), "fetch car details")
            .await
    }

    pub async fn car_types(&self) -> Result<Vec<String>, ApiError> {
        self.get("/cars/types", "fetch car types").await
    }

    // ===== Bookings =====

    pub async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError> {
        self.post("/bookings", booking, "create booking").await
    }

    pub async fn my_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.get("/bookings/me", "fetch bookings").await
    }

    pub async fn booking(&self, booking_id: i64) -> Result<Booking, ApiError> {
        self.get(&format!("/bookings/{}", booking_id), "fetch booking details")
            .await
    }

    pub async fn cancel_booking(&self, booking_id: i64) -> Result<Booking, ApiError> {
        self.delete(&format!("/bookings/{}", booking_id), "cancel booking")
            .await
    }

    // ===== Contact =====

    pub async fn submit_contact(&self, message: &ContactMessage) -> Result<ContactReceipt, ApiError> {
        self.post("/contact", message, "send message").await
    }

    // ===== News =====

    pub async fn news(&self, skip: u32, limit: u32) -> Result<Vec<NewsItem>, ApiError> {
        let query = [("skip", skip.to_string()), ("limit", limit.to_string())];
        self.get_with_query("/news", &query, "fetch news").await
    }

    pub async fn news_item(&self, news_id: i64) -> Result<NewsItem, ApiError> {
        self.get(&format!("/news/{}", news_id), "fetch news item")
            .await
    }

    // ===== Dashboard =====

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get("/dashboard/stats", "fetch dashboard stats").await
    }

    // ===== Favorites =====

    pub async fn add_favorite(&self, car_id: i64) -> Result<FavoriteAck, ApiError> {
        let body = serde_json::json!({ "car_id": car_id });
        self.post("/users/me/favorites", &body, "add favorite").await
    }

    pub async fn remove_favorite(&self, car_id: i64) -> Result<FavoriteAck, ApiError> {
        self.delete(&format!("/users/me/favorites/{}", car_id), "remove favorite")
            .await
    }

    pub async fn list_favorites(&self) -> Result<Vec<Car>, ApiError> {
        self.get("/users/me/favorites", "fetch favorites").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryTokenStorage, SessionStore};
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

    fn client_with_store() -> (ApiClient, Arc<SessionStore>) {
        let session = Arc::new(SessionStore::new(Box::new(MemoryTokenStorage::default())));
        let client = ApiClient::new("http://api.test:8000/", session.clone()).unwrap();
        (client, session)
    }

    #[test]
    fn test_url_join_strips_trailing_slash() {
        let (client, _) = client_with_store();
        assert_eq!(client.url("/cars"), "http://api.test:8000/cars");
    }

    #[test]
    fn test_request_without_credential_has_no_auth_header() {
        let (client, _) = client_with_store();
        let request = client.request(Method::GET, "/cars").build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_request_with_credential_attaches_exact_token() {
        let (client, session) = client_with_store();
        session.set_token("tok-123");

        let request = client.request(Method::GET, "/bookings/me").build().unwrap();
        let header = request.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer tok-123");
    }

    #[test]
    fn test_header_tracks_current_store_contents() {
        // The token must be read fresh per call, not captured at build time
        let (client, session) = client_with_store();

        session.set_token("first");
        let request = client.request(Method::GET, "/cars").build().unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer first"
        );

        session.set_token("second");
        let request = client.request(Method::GET, "/cars").build().unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer second"
        );

        session.clear();
        let request = client.request(Method::GET, "/cars").build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_empty_credential_is_not_attached() {
        let (client, session) = client_with_store();
        session.set_token("");
        let request = client.request(Method::GET, "/cars").build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_filter_query_lands_in_request_url() {
        let (client, _) = client_with_store();
        let filters = CarFilters {
            car_type: vec![String::new()],
            seats: vec![4],
            ..Default::default()
        };
        let request = client
            .request(Method::GET, "/cars")
            .query(&filters.to_query())
            .build()
            .unwrap();
        let url = request.url().as_str();
        assert!(url.contains("seats=4"));
        assert!(!url.contains("car_type"));
    }
}
