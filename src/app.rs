//! Application state management for the Rentaly terminal client.
//!
//! This module contains the core `App` struct that manages all application
//! state: the current tab and overlays, fetched data, the session store, and
//! background request coordination.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Local;
use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{guard, CredentialStore, Decision, FileTokenStorage, Screen, SessionStore};
use crate::config::Config;
use crate::models::{Booking, Car, CarFilters, DashboardStats, NewsItem, SearchCriteria, User};
use crate::validation::{self, BookingForm, ContactForm, RegisterForm};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// 32 leaves headroom over the handful of fetches a tab switch issues.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum concurrent API requests when a tab fans out several fetches.
const MAX_CONCURRENT_REQUESTS: usize = 4;

/// Transient status messages disappear after this long.
const STATUS_MESSAGE_SECS: u64 = 5;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for a single-line form field.
const MAX_FIELD_LENGTH: usize = 64;

/// Maximum length for the contact message body.
const MAX_MESSAGE_LENGTH: usize = 500;

/// News entries fetched per page.
const NEWS_PAGE_SIZE: u32 = 10;

/// Bookings shown in the dashboard's recent list.
const RECENT_BOOKINGS: usize = 5;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Seat counts offered by the seats filter.
pub const SEAT_FILTER_OPTIONS: [i32; 4] = [2, 4, 5, 7];

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Cars,
    News,
    Contact,
    Bookings,
    Favorites,
    Dashboard,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Cars => "Cars",
            Tab::News => "News",
            Tab::Contact => "Contact",
            Tab::Bookings => "My Bookings",
            Tab::Favorites => "Favorites",
            Tab::Dashboard => "Dashboard",
        }
    }

    /// The guard screen this tab corresponds to.
    pub fn screen(&self) -> Screen {
        match self {
            Tab::Cars => Screen::Cars,
            Tab::News => Screen::News,
            Tab::Contact => Screen::Contact,
            Tab::Bookings => Screen::Bookings,
            Tab::Favorites => Screen::Favorites,
            Tab::Dashboard => Screen::Dashboard,
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Cars => Tab::News,
            Tab::News => Tab::Contact,
            Tab::Contact => Tab::Bookings,
            Tab::Bookings => Tab::Favorites,
            Tab::Favorites => Tab::Dashboard,
            Tab::Dashboard => Tab::Cars,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Cars => Tab::Dashboard,
            Tab::News => Tab::Cars,
            Tab::Contact => Tab::News,
            Tab::Bookings => Tab::Contact,
            Tab::Favorites => Tab::Bookings,
            Tab::Dashboard => Tab::Favorites,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    LoggingIn,
    Form,
    ShowingHelp,
    ConfirmingCancel,
    ConfirmingQuit,
    Quitting,
}

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Transient status-bar message with its expiry deadline.
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(text: String, kind: MessageKind) -> Self {
        Self {
            text,
            kind,
            expires_at: Instant::now() + Duration::from_secs(STATUS_MESSAGE_SECS),
        }
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

pub fn can_add_username_char(s: &str) -> bool {
    s.len() < MAX_USERNAME_LENGTH
}

pub fn can_add_password_char(s: &str) -> bool {
    s.len() < MAX_PASSWORD_LENGTH
}

// ============================================================================
// Form Overlay State
// ============================================================================

/// Which form the overlay is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Register,
    Booking,
    Profile,
    Contact,
    Search,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub masked: bool,
    max_len: usize,
}

impl FormField {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
            max_len: MAX_FIELD_LENGTH,
        }
    }

    fn with_value(label: &'static str, value: String) -> Self {
        Self {
            value,
            ..Self::new(label)
        }
    }

    fn masked(label: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label)
        }
    }

    fn long(label: &'static str) -> Self {
        Self {
            max_len: MAX_MESSAGE_LENGTH,
            ..Self::new(label)
        }
    }
}

/// A focus-cycling field form rendered as a centered overlay. The last focus
/// position (fields.len()) is the submit button.
#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: FormKind,
    pub title: String,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

impl FormState {
    fn new(kind: FormKind, title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            title: title.into(),
            fields,
            focus: 0,
            error: None,
            submitting: false,
        }
    }

    pub fn register() -> Self {
        Self::new(
            FormKind::Register,
            "Create Account",
            vec![
                FormField::new("First name"),
                FormField::new("Last name"),
                FormField::new("Email"),
                FormField::new("Phone"),
                FormField::new("Username"),
                FormField::new("Address"),
                FormField::masked("Password"),
                FormField::masked("Confirm password"),
            ],
        )
    }

    pub fn booking(car: &Car) -> Self {
        Self::new(
            FormKind::Booking,
            format!("Book {}", car.display_name()),
            vec![
                FormField::new("Pickup location"),
                FormField::new("Drop-off location"),
                FormField::new("Pickup (YYYY-MM-DDTHH:MM)"),
                FormField::new("Return (YYYY-MM-DDTHH:MM)"),
            ],
        )
    }

    pub fn profile(user: &User) -> Self {
        Self::new(
            FormKind::Profile,
            "Edit Profile",
            vec![
                FormField::with_value("First name", user.first_name.clone().unwrap_or_default()),
                FormField::with_value("Last name", user.last_name.clone().unwrap_or_default()),
                FormField::with_value("Phone", user.phone_number.clone().unwrap_or_default()),
                FormField::with_value("Address", user.address.clone().unwrap_or_default()),
            ],
        )
    }

    pub fn contact() -> Self {
        Self::new(
            FormKind::Contact,
            "Contact Us",
            vec![
                FormField::new("Name"),
                FormField::new("Email"),
                FormField::new("Phone"),
                FormField::long("Message"),
            ],
        )
    }

    pub fn search() -> Self {
        Self::new(
            FormKind::Search,
            "Search Cars",
            vec![
                FormField::new("Pickup location"),
                FormField::new("Pickup date (YYYY-MM-DD)"),
                FormField::new("Return date (YYYY-MM-DD)"),
                FormField::new("Car type"),
                FormField::new("Seats"),
            ],
        )
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn on_submit(&self) -> bool {
        self.focus == self.fields.len()
    }

    pub fn next_focus(&mut self) {
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    pub fn prev_focus(&mut self) {
        self.focus = if self.focus == 0 {
            self.fields.len()
        } else {
            self.focus - 1
        };
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.value.len() < field.max_len {
                field.value.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            match self.kind {
                FormKind::Register => "Creating Account...",
                FormKind::Booking => "Creating Booking...",
                FormKind::Profile => "Updating...",
                FormKind::Contact => "Sending...",
                FormKind::Search => "Searching...",
            }
        } else {
            match self.kind {
                FormKind::Register => "Register Now",
                FormKind::Booking => "Create Booking",
                FormKind::Profile => "Update Profile",
                FormKind::Contact => "Send The Message",
                FormKind::Search => "Search",
            }
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from background request tasks back to the main loop.
enum FetchResult {
    Cars(Vec<Car>),
    CarTypes(Vec<String>),
    CarDetail(Car),
    SearchResults(Vec<Car>),
    Bookings(Vec<Booking>),
    BookingDetail(Booking),
    BookingCreated(Booking),
    BookingCancelled(Booking),
    Favorites(Vec<Car>),
    FavoriteAdded(i64),
    FavoriteRemoved(i64),
    Account(User),
    AccountUpdated(User),
    Stats(DashboardStats),
    News(Vec<NewsItem>),
    MoreNews(Vec<NewsItem>),
    NewsDetail(NewsItem),
    LoggedIn { username: String },
    LoginFailed(String),
    Registered,
    ContactSubmitted,
    /// Re-enable the open form and show the message in it
    FormFailed(String),
    Error {
        message: String,
        auth_failure: bool,
    },
}

fn fetch_err(what: &'static str, e: ApiError) -> FetchResult {
    FetchResult::Error {
        message: e.user_message(what),
        auth_failure: e.is_auth_failure(),
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api: ApiClient,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,
    pub status: Option<StatusMessage>,

    // Login overlay
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
    pub login_submitting: bool,
    /// Protected tab to land on once the pending login succeeds
    pending_tab: Option<Tab>,

    // Form overlay
    pub form: Option<FormState>,
    /// Car the open booking form is for
    pub booking_car: Option<Car>,

    // Cars tab
    pub cars: Vec<Car>,
    pub car_types: Vec<String>,
    pub type_filter: Option<usize>,
    pub seats_filter: Option<i32>,
    pub cars_loading: bool,
    pub car_selection: usize,
    /// Current listing came from a search rather than the filtered listing
    pub search_active: bool,

    // Bookings tab
    pub bookings: Vec<Booking>,
    pub booking_selection: usize,

    // Favorites tab
    pub favorites: Vec<Car>,
    pub favorite_selection: usize,

    // Dashboard tab
    pub account: Option<User>,
    pub stats: Option<DashboardStats>,

    // News tab
    pub news: Vec<NewsItem>,
    pub news_selection: usize,

    // Background task channel
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,
}

impl App {
    /// Create the application over the durable session slot in the user's
    /// config directory.
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        let data_dir = Config::data_dir().unwrap_or_else(|_| PathBuf::from("."));
        let session = Arc::new(SessionStore::new(Box::new(FileTokenStorage::new(data_dir))));
        Self::with_session(config, session)
    }

    /// Create the application with an explicit session store (used by tests
    /// to run against an in-memory slot).
    pub fn with_session(config: Config, session: Arc<SessionStore>) -> Result<Self> {
        let api = ApiClient::new(config.base_url(), session.clone())?;
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_username = std::env::var("RENTALY_USERNAME")
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();

        Ok(Self {
            config,
            session,
            api,

            state: AppState::Normal,
            current_tab: Tab::Cars,
            focus: Focus::List,
            status: None,

            login_username,
            login_password: String::new(),
            login_focus: LoginFocus::Username,
            login_error: None,
            login_submitting: false,
            pending_tab: None,

            form: None,
            booking_car: None,

            cars: Vec::new(),
            car_types: Vec::new(),
            type_filter: None,
            seats_filter: None,
            cars_loading: false,
            car_selection: 0,
            search_active: false,

            bookings: Vec::new(),
            booking_selection: 0,

            favorites: Vec::new(),
            favorite_selection: 0,

            account: None,
            stats: None,

            news: Vec::new(),
            news_selection: 0,

            fetch_rx: rx,
            fetch_tx: tx,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // =========================================================================
    // Status messages
    // =========================================================================

    pub fn set_status(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.status = Some(StatusMessage::new(text.into(), kind));
    }

    /// Expire the transient status message; called every event-loop tick.
    pub fn tick(&mut self) {
        if self.status.as_ref().map(|s| s.expired()).unwrap_or(false) {
            self.status = None;
        }
    }

    // =========================================================================
    // Background fetch plumbing
    // =========================================================================

    fn spawn_fetch<F>(&self, fut: F)
    where
        F: Future<Output = FetchResult> + Send + 'static,
    {
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(fut.await).await;
        });
    }

    /// Apply completed background results to the app state.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.fetch_rx.try_recv() {
            self.apply(result);
        }
    }

    fn apply(&mut self, result: FetchResult) {
        match result {
            FetchResult::Cars(cars) => {
                self.cars = cars;
                self.cars_loading = false;
                self.car_selection = self.car_selection.min(self.cars.len().saturating_sub(1));
            }
            FetchResult::CarTypes(types) => {
                self.car_types = types;
            }
            FetchResult::CarDetail(car) => {
                if let Some(slot) = self.favorites.iter_mut().find(|c| c.id == car.id) {
                    *slot = car.clone();
                }
                if let Some(slot) = self.cars.iter_mut().find(|c| c.id == car.id) {
                    *slot = car;
                }
            }
            FetchResult::SearchResults(cars) => {
                self.form = None;
                self.state = AppState::Normal;
                self.cars = cars;
                self.cars_loading = false;
                self.search_active = true;
                self.car_selection = 0;
                self.current_tab = Tab::Cars;
                if self.cars.is_empty() {
                    self.set_status("No cars found matching your criteria", MessageKind::Info);
                }
            }
            FetchResult::Bookings(bookings) => {
                self.bookings = bookings;
                self.booking_selection = self
                    .booking_selection
                    .min(self.bookings.len().saturating_sub(1));
            }
            FetchResult::BookingDetail(booking) => {
                if let Some(slot) = self.bookings.iter_mut().find(|b| b.id == booking.id) {
                    *slot = booking;
                }
            }
            FetchResult::BookingCreated(booking) => {
                self.form = None;
                self.booking_car = None;
                self.state = AppState::Normal;
                self.set_status(
                    format!("Booking #{} created successfully", booking.id),
                    MessageKind::Success,
                );
                self.switch_tab(Tab::Bookings);
            }
            FetchResult::BookingCancelled(_) => {
                self.set_status("Booking cancelled successfully", MessageKind::Success);
                self.refresh_bookings();
            }
            FetchResult::Favorites(cars) => {
                self.favorites = cars;
                self.favorite_selection = self
                    .favorite_selection
                    .min(self.favorites.len().saturating_sub(1));
            }
            FetchResult::FavoriteAdded(_) => {
                self.set_status("Added to favorites", MessageKind::Success);
                self.refresh_favorites();
            }
            FetchResult::FavoriteRemoved(_) => {
                self.set_status("Removed from favorites", MessageKind::Success);
                self.refresh_favorites();
            }
            FetchResult::Account(user) => {
                self.account = Some(user);
            }
            FetchResult::AccountUpdated(user) => {
                self.form = None;
                self.state = AppState::Normal;
                self.account = Some(user);
                self.set_status("Profile updated successfully!", MessageKind::Success);
            }
            FetchResult::Stats(stats) => {
                self.stats = Some(stats);
            }
            FetchResult::News(news) => {
                self.news = news;
                self.news_selection = self.news_selection.min(self.news.len().saturating_sub(1));
            }
            FetchResult::MoreNews(mut items) => {
                if items.is_empty() {
                    self.set_status("No more news", MessageKind::Info);
                } else {
                    self.news.append(&mut items);
                }
            }
            FetchResult::NewsDetail(item) => {
                if let Some(slot) = self.news.iter_mut().find(|n| n.id == item.id) {
                    *slot = item;
                }
            }
            FetchResult::LoggedIn { username } => {
                info!("Login successful");
                self.login_submitting = false;
                self.login_password.clear();
                self.login_error = None;
                self.state = AppState::Normal;

                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.set_status("Login successful!", MessageKind::Success);
                let target = self.pending_tab.take().unwrap_or(Tab::Dashboard);
                self.switch_tab(target);
            }
            FetchResult::LoginFailed(message) => {
                self.login_submitting = false;
                self.login_error = Some(message);
            }
            FetchResult::Registered => {
                self.form = None;
                self.state = AppState::Normal;
                self.set_status(
                    "Registration successful! You can now login.",
                    MessageKind::Success,
                );
                self.start_login();
            }
            FetchResult::ContactSubmitted => {
                self.form = None;
                self.state = AppState::Normal;
                self.set_status("Message sent, we'll get back to you shortly", MessageKind::Success);
            }
            FetchResult::FormFailed(message) => {
                if let Some(form) = self.form.as_mut() {
                    form.submitting = false;
                    form.error = Some(message);
                } else {
                    self.set_status(message, MessageKind::Error);
                }
            }
            FetchResult::Error {
                message,
                auth_failure,
            } => {
                self.set_status(message, MessageKind::Error);
                // A rejected credential routes to the login overlay; the
                // stored token stays until an explicit logout or a new login
                // overwrites it.
                if auth_failure && self.state == AppState::Normal {
                    self.start_login();
                }
            }
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switch to a tab, going through the access guard first. Protected tabs
    /// open the login overlay instead when no session is present; nothing is
    /// fetched for them in that case.
    pub fn switch_tab(&mut self, tab: Tab) {
        match guard::check(tab.screen(), &self.session) {
            Decision::Proceed => {
                self.current_tab = tab;
                self.focus = Focus::List;
                self.load_tab(tab);
            }
            Decision::RedirectToLogin => {
                self.pending_tab = Some(tab);
                self.set_status("Please log in to view your account", MessageKind::Info);
                self.start_login();
            }
        }
    }

    fn load_tab(&mut self, tab: Tab) {
        match tab {
            Tab::Cars => {
                if self.cars.is_empty() && !self.cars_loading {
                    self.refresh_cars();
                }
                if self.car_types.is_empty() {
                    self.fetch_car_types();
                }
            }
            Tab::News => {
                if self.news.is_empty() {
                    self.refresh_news();
                }
            }
            Tab::Contact => {}
            Tab::Bookings => self.refresh_bookings(),
            Tab::Favorites => self.refresh_favorites(),
            Tab::Dashboard => self.refresh_dashboard(),
        }
    }

    /// Force-reload the data behind the current tab.
    pub fn refresh_current_tab(&mut self) {
        match self.current_tab {
            Tab::Cars => {
                self.refresh_cars();
                if self.car_types.is_empty() {
                    self.fetch_car_types();
                }
            }
            Tab::News => self.refresh_news(),
            Tab::Contact => {}
            Tab::Bookings => self.refresh_bookings(),
            Tab::Favorites => self.refresh_favorites(),
            Tab::Dashboard => self.refresh_dashboard(),
        }
    }

    // =========================================================================
    // Data loading
    // =========================================================================

    fn current_filters(&self) -> CarFilters {
        CarFilters {
            car_type: self
                .type_filter
                .and_then(|i| self.car_types.get(i).cloned())
                .into_iter()
                .collect(),
            seats: self.seats_filter.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn refresh_cars(&mut self) {
        self.cars_loading = true;
        self.search_active = false;
        let filters = self.current_filters();
        let api = self.api.clone();
        self.spawn_fetch(async move {
            match api.list_cars(&filters).await {
                Ok(cars) => FetchResult::Cars(cars),
                Err(e) => fetch_err("fetch cars", e),
            }
        });
    }

    fn fetch_car_types(&self) {
        let api = self.api.clone();
        self.spawn_fetch(async move {
            match api.car_types().await {
                Ok(types) => FetchResult::CarTypes(types),
                Err(e) => fetch_err("fetch car types", e),
            }
        });
    }

    fn refresh_news(&self) {
        let api = self.api.clone();
        self.spawn_fetch(async move {
            match api.news(0, NEWS_PAGE_SIZE).await {
                Ok(news) => FetchResult::News(news),
                Err(e) => fetch_err("fetch news", e),
            }
        });
    }

    fn refresh_bookings(&self) {
        let api = self.api.clone();
        self.spawn_fetch(async move {
            match api.my_bookings().await {
                Ok(bookings) => FetchResult::Bookings(bookings),
                Err(e) => fetch_err("fetch bookings", e),
            }
        });
    }

    fn refresh_favorites(&self) {
        let api = self.api.clone();
        self.spawn_fetch(async move {
            match api.list_favorites().await {
                Ok(cars) => FetchResult::Favorites(cars),
                Err(e) => fetch_err("fetch favorites", e),
            }
        });
    }

    /// The dashboard needs the account, the stats and the recent bookings;
    /// fetch them concurrently through one task.
    fn refresh_dashboard(&self) {
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            type Fetch = Pin<Box<dyn Future<Output = FetchResult> + Send>>;
            let fetches: Vec<Fetch> = vec![
                {
                    let api = api.clone();
                    Box::pin(async move {
                        match api.current_user().await {
                            Ok(user) => FetchResult::Account(user),
                            Err(e) => fetch_err("fetch account", e),
                        }
                    })
                },
                {
                    let api = api.clone();
                    Box::pin(async move {
                        match api.dashboard_stats().await {
                            Ok(stats) => FetchResult::Stats(stats),
                            Err(e) => fetch_err("fetch dashboard stats", e),
                        }
                    })
                },
                {
                    let api = api.clone();
                    Box::pin(async move {
                        match api.my_bookings().await {
                            Ok(bookings) => FetchResult::Bookings(bookings),
                            Err(e) => fetch_err("fetch bookings", e),
                        }
                    })
                },
            ];

            let mut results = stream::iter(fetches).buffer_unordered(MAX_CONCURRENT_REQUESTS);
            while let Some(result) = results.next().await {
                let _ = tx.send(result).await;
            }
        });
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Open the login overlay. A remembered password pre-fills when the
    /// keychain has one for the current username.
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_error = None;
        self.login_submitting = false;

        if !self.login_username.is_empty()
            && self.login_password.is_empty()
            && CredentialStore::has_stored(&self.login_username)
        {
            if let Ok(password) = CredentialStore::stored_password(&self.login_username) {
                self.login_password = password;
            }
        }

        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else if self.login_password.is_empty() {
            LoginFocus::Password
        } else {
            LoginFocus::Button
        };
    }

    pub fn cancel_login(&mut self) {
        self.state = AppState::Normal;
        self.pending_tab = None;
        self.login_error = None;
    }

    /// Submit the login form in the background.
    pub fn submit_login(&mut self) {
        if self.login_submitting {
            return;
        }
        if self.login_username.is_empty() || self.login_password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return;
        }

        self.login_error = None;
        self.login_submitting = true;

        let api = self.api.clone();
        let username = self.login_username.clone();
        let password = self.login_password.clone();
        self.spawn_fetch(async move {
            match api.login(&username, &password).await {
                Ok(_) => {
                    if let Err(e) = CredentialStore::remember(&username, &password) {
                        warn!(error = %e, "Failed to store credentials");
                    }
                    FetchResult::LoggedIn { username }
                }
                Err(e) if e.is_auth_failure() => {
                    FetchResult::LoginFailed("Invalid username or password".to_string())
                }
                Err(e) => FetchResult::LoginFailed(e.user_message("log in")),
            }
        });
    }

    /// Log out: clear the stored credential and all account data, then show
    /// the login overlay over the public cars tab. Never a network call.
    pub fn logout(&mut self) {
        self.api.logout();
        self.account = None;
        self.stats = None;
        self.bookings.clear();
        self.favorites.clear();
        self.pending_tab = None;
        self.current_tab = Tab::Cars;
        self.set_status("Logged out", MessageKind::Info);
        self.start_login();
    }

    // =========================================================================
    // Cars tab actions
    // =========================================================================

    pub fn selected_car(&self) -> Option<&Car> {
        match self.current_tab {
            Tab::Cars => self.cars.get(self.car_selection),
            Tab::Favorites => self.favorites.get(self.favorite_selection),
            _ => None,
        }
    }

    pub fn is_favorite(&self, car_id: i64) -> bool {
        self.favorites.iter().any(|c| c.id == car_id)
    }

    /// Cycle the car-type filter through the known taxonomy and reload.
    pub fn cycle_type_filter(&mut self) {
        if self.car_types.is_empty() {
            return;
        }
        self.type_filter = match self.type_filter {
            None => Some(0),
            Some(i) if i + 1 < self.car_types.len() => Some(i + 1),
            Some(_) => None,
        };
        self.refresh_cars();
    }

    /// Cycle the seats filter and reload.
    pub fn cycle_seats_filter(&mut self) {
        let pos = self
            .seats_filter
            .and_then(|s| SEAT_FILTER_OPTIONS.iter().position(|&o| o == s));
        self.seats_filter = match pos {
            None => Some(SEAT_FILTER_OPTIONS[0]),
            Some(i) if i + 1 < SEAT_FILTER_OPTIONS.len() => Some(SEAT_FILTER_OPTIONS[i + 1]),
            Some(_) => None,
        };
        self.refresh_cars();
    }

    pub fn reset_filters(&mut self) {
        self.type_filter = None;
        self.seats_filter = None;
        self.refresh_cars();
    }

    // =========================================================================
    // Forms
    // =========================================================================

    pub fn open_register(&mut self) {
        self.form = Some(FormState::register());
        self.state = AppState::Form;
    }

    pub fn open_contact(&mut self) {
        self.form = Some(FormState::contact());
        self.state = AppState::Form;
    }

    pub fn open_search(&mut self) {
        self.form = Some(FormState::search());
        self.state = AppState::Form;
    }

    pub fn open_profile(&mut self) {
        if let Some(user) = &self.account {
            self.form = Some(FormState::profile(user));
            self.state = AppState::Form;
        } else {
            self.set_status("Profile not loaded yet", MessageKind::Info);
        }
    }

    /// Start a booking for the selected car. Requires a session: visitors
    /// are sent to the login overlay before any booking state is created.
    pub fn start_booking(&mut self) {
        let Some(car) = self.selected_car().cloned() else {
            return;
        };
        if !car.is_available() {
            self.set_status("This car is currently unavailable", MessageKind::Error);
            return;
        }
        if !self.is_authenticated() {
            self.set_status("Please login to make a booking", MessageKind::Error);
            self.start_login();
            return;
        }
        self.form = Some(FormState::booking(&car));
        self.booking_car = Some(car);
        self.state = AppState::Form;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.booking_car = None;
        self.state = AppState::Normal;
    }

    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        if form.submitting {
            return;
        }
        match form.kind {
            FormKind::Register => self.submit_register(),
            FormKind::Booking => self.submit_booking(),
            FormKind::Profile => self.submit_profile(),
            FormKind::Contact => self.submit_contact(),
            FormKind::Search => self.submit_search(),
        }
    }

    fn submit_register(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let raw = RegisterForm {
            first_name: form.value(0).to_string(),
            last_name: form.value(1).to_string(),
            email: form.value(2).to_string(),
            phone_number: form.value(3).to_string(),
            username: form.value(4).to_string(),
            address: form.value(5).to_string(),
            password: form.value(6).to_string(),
            confirm_password: form.value(7).to_string(),
        };
        match validation::validate_registration(&raw) {
            Ok(request) => {
                form.submitting = true;
                form.error = None;
                let api = self.api.clone();
                self.spawn_fetch(async move {
                    match api.register(&request).await {
                        Ok(_) => FetchResult::Registered,
                        Err(e) => FetchResult::FormFailed(e.user_message("register")),
                    }
                });
            }
            Err(errors) => {
                form.error = Some(errors[0].message.clone());
            }
        }
    }

    fn submit_booking(&mut self) {
        let Some(car) = self.booking_car.clone() else {
            return;
        };
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let raw = BookingForm {
            car_id: Some(car.id),
            daily_rate: car.daily_rate,
            pickup_location: form.value(0).to_string(),
            dropoff_location: form.value(1).to_string(),
            pickup_datetime: form.value(2).to_string(),
            return_datetime: form.value(3).to_string(),
        };
        // Validation failures never reach the network
        match validation::validate_booking(&raw, Local::now().naive_local()) {
            Ok(payload) => {
                form.submitting = true;
                form.error = None;
                let api = self.api.clone();
                self.spawn_fetch(async move {
                    match api.create_booking(&payload).await {
                        Ok(booking) => FetchResult::BookingCreated(booking),
                        Err(e) => FetchResult::FormFailed(e.user_message("create booking")),
                    }
                });
            }
            Err(errors) => {
                form.error = Some(errors[0].message.clone());
            }
        }
    }

    fn submit_profile(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let update = crate::models::ProfileUpdate {
            first_name: form.value(0).trim().to_string(),
            last_name: form.value(1).trim().to_string(),
            phone_number: form.value(2).trim().to_string(),
            address: form.value(3).trim().to_string(),
        };
        form.submitting = true;
        form.error = None;
        let api = self.api.clone();
        self.spawn_fetch(async move {
            match api.update_profile(&update).await {
                Ok(user) => FetchResult::AccountUpdated(user),
                Err(e) => FetchResult::FormFailed(e.user_message("update profile")),
            }
        });
    }

    fn submit_contact(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let raw = ContactForm {
            name: form.value(0).to_string(),
            email: form.value(1).to_string(),
            phone: form.value(2).to_string(),
            message: form.value(3).to_string(),
        };
        match validation::validate_contact(&raw) {
            Ok(message) => {
                form.submitting = true;
                form.error = None;
                let api = self.api.clone();
                self.spawn_fetch(async move {
                    match api.submit_contact(&message).await {
                        Ok(_) => FetchResult::ContactSubmitted,
                        Err(e) => FetchResult::FormFailed(e.user_message("send message")),
                    }
                });
            }
            Err(errors) => {
                form.error = Some(errors[0].message.clone());
            }
        }
    }

    fn submit_search(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let criteria = SearchCriteria {
            pickup_location: Some(form.value(0).to_string()),
            pickup_date: Some(form.value(1).to_string()),
            return_date: Some(form.value(2).to_string()),
            car_type: Some(form.value(3).to_string()),
            seats: form.value(4).trim().parse().ok(),
        };
        form.submitting = true;
        form.error = None;
        self.cars_loading = true;
        let api = self.api.clone();
        self.spawn_fetch(async move {
            match api.search_cars(&criteria).await {
                Ok(cars) => FetchResult::SearchResults(cars),
                Err(e) => FetchResult::FormFailed(e.user_message("search cars")),
            }
        });
    }

    // =========================================================================
    // Favorites and bookings actions
    // =========================================================================

    /// Toggle the selected car in the favorites list. Visitors are routed to
    /// the login overlay; no favorites call is ever issued without a session.
    pub fn toggle_favorite(&mut self) {
        let Some(car) = self.selected_car() else {
            return;
        };
        let car_id = car.id;

        if !self.is_authenticated() {
            self.set_status("Please log in to manage favorites", MessageKind::Info);
            self.start_login();
            return;
        }

        let currently_favorite = self.is_favorite(car_id);
        let api = self.api.clone();
        self.spawn_fetch(async move {
            if currently_favorite {
                match api.remove_favorite(car_id).await {
                    Ok(_) => FetchResult::FavoriteRemoved(car_id),
                    Err(e) => fetch_err("remove favorite", e),
                }
            } else {
                match api.add_favorite(car_id).await {
                    Ok(_) => FetchResult::FavoriteAdded(car_id),
                    Err(e) => fetch_err("add favorite", e),
                }
            }
        });
    }

    /// Re-fetch the selected car so the detail panel shows the full record;
    /// list responses can omit the description.
    pub fn load_car_detail(&mut self) {
        let Some(car) = self.selected_car() else {
            return;
        };
        let car_id = car.id;
        let api = self.api.clone();
        self.spawn_fetch(async move {
            match api.car(car_id).await {
                Ok(car) => FetchResult::CarDetail(car),
                Err(e) => fetch_err("fetch car details", e),
            }
        });
    }

    /// Re-fetch the selected booking; its status may have moved on.
    pub fn load_booking_detail(&mut self) {
        let Some(booking) = self.selected_booking() else {
            return;
        };
        let booking_id = booking.id;
        let api = self.api.clone();
        self.spawn_fetch(async move {
            match api.booking(booking_id).await {
                Ok(booking) => FetchResult::BookingDetail(booking),
                Err(e) => fetch_err("fetch booking details", e),
            }
        });
    }

    /// Fetch the full article for the selected headline.
    pub fn load_news_detail(&mut self) {
        let Some(item) = self.news.get(self.news_selection) else {
            return;
        };
        let news_id = item.id;
        let api = self.api.clone();
        self.spawn_fetch(async move {
            match api.news_item(news_id).await {
                Ok(item) => FetchResult::NewsDetail(item),
                Err(e) => fetch_err("fetch news item", e),
            }
        });
    }

    /// Append the next page of news.
    pub fn load_more_news(&mut self) {
        let skip = self.news.len() as u32;
        let api = self.api.clone();
        self.spawn_fetch(async move {
            match api.news(skip, NEWS_PAGE_SIZE).await {
                Ok(news) => FetchResult::MoreNews(news),
                Err(e) => fetch_err("fetch news", e),
            }
        });
    }

    pub fn selected_booking(&self) -> Option<&Booking> {
        self.bookings.get(self.booking_selection)
    }

    /// Ask for confirmation before cancelling the selected booking.
    pub fn request_cancel_booking(&mut self) {
        match self.selected_booking() {
            Some(b) if b.booking_status.is_cancellable() => {
                self.state = AppState::ConfirmingCancel;
            }
            Some(_) => {
                self.set_status("This booking can no longer be cancelled", MessageKind::Info);
            }
            None => {}
        }
    }

    pub fn confirm_cancel_booking(&mut self) {
        self.state = AppState::Normal;
        let Some(booking) = self.selected_booking() else {
            return;
        };
        let booking_id = booking.id;
        let api = self.api.clone();
        self.spawn_fetch(async move {
            match api.cancel_booking(booking_id).await {
                Ok(booking) => FetchResult::BookingCancelled(booking),
                Err(e) => fetch_err("cancel booking", e),
            }
        });
    }

    pub fn recent_bookings(&self) -> &[Booking] {
        &self.bookings[..self.bookings.len().min(RECENT_BOOKINGS)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStorage;

    fn test_app() -> App {
        let session = Arc::new(SessionStore::new(Box::new(MemoryTokenStorage::default())));
        App::with_session(Config::default(), session).unwrap()
    }

    #[test]
    fn test_protected_tab_redirects_to_login() {
        let mut app = test_app();
        for tab in [Tab::Bookings, Tab::Favorites, Tab::Dashboard] {
            app.state = AppState::Normal;
            app.current_tab = Tab::Cars;
            app.switch_tab(tab);
            // The tab is never entered and the login overlay opens instead
            assert_eq!(app.current_tab, Tab::Cars, "{:?} must not be entered", tab);
            assert_eq!(app.state, AppState::LoggingIn);
        }
    }

    #[tokio::test]
    async fn test_protected_tab_opens_when_authenticated() {
        let mut app = test_app();
        app.session.set_token("tok");
        app.switch_tab(Tab::Dashboard);
        assert_eq!(app.current_tab, Tab::Dashboard);
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_favorite_toggle_requires_login() {
        let mut app = test_app();
        app.cars = vec![sample_car(1)];
        app.car_selection = 0;
        // Unauthenticated: routed to login, nothing spawned
        app.toggle_favorite();
        assert_eq!(app.state, AppState::LoggingIn);
    }

    #[test]
    fn test_booking_requires_login() {
        let mut app = test_app();
        app.cars = vec![sample_car(1)];
        app.start_booking();
        assert_eq!(app.state, AppState::LoggingIn);
        assert!(app.form.is_none());
    }

    #[tokio::test]
    async fn test_login_lands_on_pending_tab() {
        let mut app = test_app();
        app.switch_tab(Tab::Favorites);
        assert_eq!(app.state, AppState::LoggingIn);

        // Simulate the credential arriving (the API client stores it on
        // success) followed by the task's result
        app.session.set_token("tok");
        app.apply(FetchResult::LoggedIn {
            username: "kmercer".to_string(),
        });
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.current_tab, Tab::Favorites);
    }

    #[test]
    fn test_logout_clears_session_and_account_data() {
        let mut app = test_app();
        app.session.set_token("tok");
        app.account = Some(sample_user());
        app.bookings = vec![];
        app.logout();
        assert!(!app.is_authenticated());
        assert!(app.account.is_none());
        assert_eq!(app.state, AppState::LoggingIn);
        assert_eq!(app.current_tab, Tab::Cars);
    }

    #[test]
    fn test_login_failure_reenables_submit() {
        let mut app = test_app();
        app.login_submitting = true;
        app.apply(FetchResult::LoginFailed("Invalid username or password".into()));
        assert!(!app.login_submitting);
        assert_eq!(
            app.login_error.as_deref(),
            Some("Invalid username or password")
        );
    }

    #[test]
    fn test_invalid_booking_form_never_submits() {
        let mut app = test_app();
        app.session.set_token("tok");
        let car = sample_car(7);
        app.form = Some(FormState::booking(&car));
        app.booking_car = Some(car);
        app.state = AppState::Form;

        // Return before pickup
        let form = app.form.as_mut().unwrap();
        form.fields[0].value = "Downtown".to_string();
        form.fields[1].value = "Airport".to_string();
        form.fields[2].value = "2099-07-04T10:00".to_string();
        form.fields[3].value = "2099-07-01T10:00".to_string();

        app.submit_form();
        let form = app.form.as_ref().unwrap();
        assert!(!form.submitting, "invalid form must not reach the network");
        assert!(form.error.as_deref().unwrap().contains("after pickup"));
    }

    #[test]
    fn test_form_focus_cycles_through_submit() {
        let mut form = FormState::contact();
        assert_eq!(form.focus, 0);
        for _ in 0..form.fields.len() {
            form.next_focus();
        }
        assert!(form.on_submit());
        form.next_focus();
        assert_eq!(form.focus, 0);
        form.prev_focus();
        assert!(form.on_submit());
    }

    #[test]
    fn test_tab_cycle_is_closed() {
        let mut tab = Tab::Cars;
        for _ in 0..6 {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Cars);
        assert_eq!(Tab::Cars.prev(), Tab::Dashboard);
    }

    fn sample_car(id: i64) -> Car {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "make": "Jeep",
            "model": "Renegade",
            "daily_rate": 265.0,
            "seats": 5
        }))
        .unwrap()
    }

    fn sample_user() -> User {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "username": "kmercer",
            "email": "k@example.com"
        }))
        .unwrap()
    }
}
