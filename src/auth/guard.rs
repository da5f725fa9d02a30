//! Access control for account-only screens.
//!
//! Every navigable surface of the client is a `Screen`; the guard decides,
//! before any content for a screen is loaded, whether the current session
//! may enter it. Unauthenticated visitors are redirected to the login
//! screen and nothing belonging to the protected screen runs.

use super::SessionStore;

/// Navigable surfaces of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Cars,
    CarDetail,
    Booking,
    News,
    Contact,
    Login,
    Register,
    Dashboard,
    Profile,
    Bookings,
    Favorites,
}

/// The fixed set of screens that must never show content to an
/// unauthenticated visitor.
pub const PROTECTED_SCREENS: [Screen; 4] = [
    Screen::Dashboard,
    Screen::Profile,
    Screen::Bookings,
    Screen::Favorites,
];

impl Screen {
    pub fn requires_auth(&self) -> bool {
        PROTECTED_SCREENS.contains(self)
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    RedirectToLogin,
}

/// Decide whether `screen` may be entered with the current session. Callers
/// must consult this before initiating any load for the screen.
pub fn check(screen: Screen, session: &SessionStore) -> Decision {
    if screen.requires_auth() && !session.is_authenticated() {
        Decision::RedirectToLogin
    } else {
        Decision::Proceed
    }
}

/// Account chrome in the navigation bar: which pair of links to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavBadge {
    /// Visitor: offer login and registration.
    LoginRegister,
    /// Signed in: offer the dashboard and logout.
    DashboardLogout,
}

pub fn nav_badge(session: &SessionStore) -> NavBadge {
    if session.is_authenticated() {
        NavBadge::DashboardLogout
    } else {
        NavBadge::LoginRegister
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStorage;

    fn store() -> SessionStore {
        SessionStore::new(Box::new(MemoryTokenStorage::default()))
    }

    #[test]
    fn test_every_protected_screen_redirects_when_unauthenticated() {
        let session = store();
        for screen in PROTECTED_SCREENS {
            assert_eq!(
                check(screen, &session),
                Decision::RedirectToLogin,
                "{:?} must redirect unauthenticated visitors",
                screen
            );
        }
    }

    #[test]
    fn test_protected_screens_proceed_when_authenticated() {
        let session = store();
        session.set_token("tok");
        for screen in PROTECTED_SCREENS {
            assert_eq!(check(screen, &session), Decision::Proceed);
        }
    }

    #[test]
    fn test_public_screens_never_redirect() {
        let session = store();
        for screen in [
            Screen::Cars,
            Screen::CarDetail,
            Screen::Booking,
            Screen::News,
            Screen::Contact,
            Screen::Login,
            Screen::Register,
        ] {
            assert_eq!(check(screen, &session), Decision::Proceed);
        }
    }

    #[test]
    fn test_empty_credential_still_redirects() {
        let session = store();
        session.set_token("");
        assert_eq!(check(Screen::Dashboard, &session), Decision::RedirectToLogin);
    }

    #[test]
    fn test_nav_badge_reflects_session_state() {
        let session = store();
        assert_eq!(nav_badge(&session), NavBadge::LoginRegister);
        session.set_token("tok");
        assert_eq!(nav_badge(&session), NavBadge::DashboardLogout);
        session.clear();
        assert_eq!(nav_badge(&session), NavBadge::LoginRegister);
    }
}
