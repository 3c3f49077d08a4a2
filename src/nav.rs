//! Projection of the session onto the navigation bar.

use crate::session::SessionState;

/// Which auth controls the top bar shows, and the welcome text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavView {
    pub show_login: bool,
    pub show_register: bool,
    pub show_logout: bool,
    pub welcome: Option<String>,
}

impl NavView {
    /// State while the session check is in flight: every auth control is
    /// hidden so nothing login-dependent can be acted on yet.
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        *self == Self::pending()
    }
}

/// Map a resolved session to its nav state. Pure; calling it twice with the
/// same state yields the same view.
pub fn render(state: &SessionState) -> NavView {
    if state.logged_in {
        NavView {
            show_login: false,
            show_register: false,
            show_logout: true,
            welcome: state
                .username
                .as_deref()
                .map(|name| format!("Welcome, {}", name)),
        }
    } else {
        NavView {
            show_login: true,
            show_register: true,
            show_logout: false,
            welcome: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_logged_in_view() {
        let view = render(&SessionState::logged_in("alice"));
        assert_eq!(
            view,
            NavView {
                show_login: false,
                show_register: false,
                show_logout: true,
                welcome: Some("Welcome, alice".to_string()),
            }
        );
    }

    #[test]
    fn test_logged_out_view() {
        let view = render(&SessionState::logged_out());
        assert!(view.show_login);
        assert!(view.show_register);
        assert!(!view.show_logout);
        assert_eq!(view.welcome, None);
    }

    #[test]
    fn test_pending_hides_everything() {
        let view = NavView::pending();
        assert!(view.is_pending());
        assert!(!view.show_login && !view.show_register && !view.show_logout);
        assert!(!render(&SessionState::logged_out()).is_pending());
    }

    proptest! {
        #[test]
        fn prop_render_is_idempotent(logged_in in any::<bool>(), name in proptest::option::of("[a-z]{1,12}")) {
            let state = SessionState { logged_in, username: name };
            let first = render(&state);
            let second = render(&state);
            prop_assert_eq!(first, second);
        }
    }
}
