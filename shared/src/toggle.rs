//! Favorite toggle protocol.
//!
//! The set is only mutated after the server confirms, and every mutation is
//! followed by a full button re-render in the same call, so no button can show
//! a state the server has not confirmed.

use crate::error::{ToggleError, TransportError};
use crate::favorites::{FavoriteAction, FavoriteReply, FavoriteSet, FavoriteStore, favorite_label};
use crate::notice::Notice;

/// A control bound to one item id.
pub trait FavoriteButton {
    fn item_id(&self) -> Option<String>;
    fn is_disabled(&self) -> bool;
    fn set_disabled(&self, disabled: bool);
    fn set_label(&self, label: &str);
}

/// Every favorite button currently on the page.
pub trait ButtonSurface {
    type Button: FavoriteButton;

    fn favorite_buttons(&self) -> Vec<Self::Button>;
}

#[allow(async_fn_in_trait)]
pub trait FavoriteTransport {
    /// One POST to the add or remove endpoint. The anti-forgery token is the
    /// transport's concern.
    async fn send(&self, action: FavoriteAction, item_id: &str)
    -> Result<FavoriteReply, TransportError>;
}

pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Button was disabled; a request for it is already in flight.
    Skipped,
    LoginRequired,
    Applied(FavoriteAction),
}

/// Rewrite every bound button's label from `favorites`. Returns how many were touched.
pub fn refresh_buttons<S: ButtonSurface>(surface: &S, favorites: &FavoriteSet) -> usize {
    let mut touched = 0;
    for button in surface.favorite_buttons() {
        let Some(id) = button.item_id() else {
            continue;
        };
        button.set_label(favorite_label(favorites.contains(&id)));
        touched += 1;
    }
    touched
}

/// Holds a button disabled for the duration of one request.
struct DisabledGuard<'a, B: FavoriteButton + ?Sized> {
    button: &'a B,
}

impl<'a, B: FavoriteButton + ?Sized> DisabledGuard<'a, B> {
    fn engage(button: &'a B) -> Self {
        button.set_disabled(true);
        Self { button }
    }
}

impl<B: FavoriteButton + ?Sized> Drop for DisabledGuard<'_, B> {
    fn drop(&mut self) {
        self.button.set_disabled(false);
    }
}

/// Sole owner of the favorite endpoints and sole writer of the page's `FavoriteStore`.
pub struct FavoriteState<T, S, N> {
    favorites: FavoriteStore,
    transport: T,
    surface: S,
    notifier: N,
    authenticated: bool,
}

impl<T, S, N> FavoriteState<T, S, N>
where
    T: FavoriteTransport,
    S: ButtonSurface,
    N: Notifier,
{
    pub fn new(favorites: FavoriteStore, transport: T, surface: S, notifier: N) -> Self {
        Self {
            favorites,
            transport,
            surface,
            notifier,
            authenticated: true,
        }
    }

    pub fn with_authentication(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    pub fn favorites(&self) -> &FavoriteStore {
        &self.favorites
    }

    pub fn refresh(&self) -> usize {
        self.favorites
            .with(|favorites| refresh_buttons(&self.surface, favorites))
    }

    /// Flip `item_id`'s membership through the server.
    ///
    /// Failures are reported to the user here and also returned for logging.
    /// The button is disabled before the request goes out and re-enabled on
    /// every exit path after it.
    pub async fn toggle<B>(&self, button: &B, item_id: &str) -> Result<ToggleOutcome, ToggleError>
    where
        B: FavoriteButton + ?Sized,
    {
        if button.is_disabled() {
            return Ok(ToggleOutcome::Skipped);
        }
        if !self.authenticated {
            self.notifier.notify(&Notice::LoginRequired);
            return Ok(ToggleOutcome::LoginRequired);
        }

        let action = FavoriteAction::for_membership(self.favorites.contains(item_id));
        let _guard = DisabledGuard::engage(button);

        match self.transport.send(action, item_id).await {
            Ok(reply) if reply.is_ok() => {
                self.favorites.apply(action, item_id);
                self.refresh();
                Ok(ToggleOutcome::Applied(action))
            }
            Ok(reply) => {
                self.notifier.notify(&Notice::FavoriteRejected);
                Err(ToggleError::Rejected {
                    status: reply.status,
                })
            }
            Err(e) => {
                self.notifier.notify(&Notice::FavoriteFailed);
                Err(ToggleError::Transport(e))
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::executor::block_on;

    use super::fakes::*;
    use super::*;
    use crate::favorites::{FAVORITED_LABEL, NOT_FAVORITED_LABEL};

    /// Scripted transport that records what it was asked and whether the
    /// button was already disabled at that moment.
    #[derive(Clone)]
    struct ScriptedTransport {
        reply: Result<FavoriteReply, TransportError>,
        calls: Rc<RefCell<Vec<(FavoriteAction, String)>>>,
        watch: Option<FakeButton>,
        disabled_during_call: Rc<RefCell<Vec<bool>>>,
    }

    impl ScriptedTransport {
        fn answering(status: &str) -> Self {
            Self::with_result(Ok(FavoriteReply {
                status: status.into(),
            }))
        }

        fn with_result(reply: Result<FavoriteReply, TransportError>) -> Self {
            Self {
                reply,
                calls: Rc::default(),
                watch: None,
                disabled_during_call: Rc::default(),
            }
        }

        fn watching(mut self, button: &FakeButton) -> Self {
            self.watch = Some(button.clone());
            self
        }
    }

    impl FavoriteTransport for ScriptedTransport {
        async fn send(
            &self,
            action: FavoriteAction,
            item_id: &str,
        ) -> Result<FavoriteReply, TransportError> {
            self.calls.borrow_mut().push((action, item_id.into()));
            if let Some(button) = &self.watch {
                self.disabled_during_call
                    .borrow_mut()
                    .push(button.is_disabled());
            }
            self.reply.clone()
        }
    }

    struct Harness {
        state: FavoriteState<ScriptedTransport, FakeSurface, RecordingNotifier>,
        transport: ScriptedTransport,
        notifier: RecordingNotifier,
    }

    fn harness(
        initial: &[&str],
        transport: ScriptedTransport,
        buttons: &[FakeButton],
    ) -> Harness {
        let notifier = RecordingNotifier::default();
        let state = FavoriteState::new(
            FavoriteStore::new(FavoriteSet::from_ids(initial.iter().copied())),
            transport.clone(),
            FakeSurface::with(buttons),
            notifier.clone(),
        );
        Harness {
            state,
            transport,
            notifier,
        }
    }

    #[test]
    fn successful_add_updates_set_and_every_bound_button() {
        let clicked = FakeButton::bound("123", NOT_FAVORITED_LABEL);
        let popup_copy = FakeButton::bound("123", NOT_FAVORITED_LABEL);
        let other = FakeButton::bound("999", FAVORITED_LABEL);
        let transport = ScriptedTransport::answering("ok").watching(&clicked);
        let h = harness(
            &["999"],
            transport,
            &[clicked.clone(), popup_copy.clone(), other.clone()],
        );

        let outcome = block_on(h.state.toggle(&clicked, "123"));

        assert_eq!(outcome, Ok(ToggleOutcome::Applied(FavoriteAction::Add)));
        assert_eq!(
            *h.transport.calls.borrow(),
            vec![(FavoriteAction::Add, "123".to_string())]
        );
        assert!(h.state.favorites().contains("123"));
        assert!(h.state.favorites().contains("999"));
        assert_eq!(clicked.label(), FAVORITED_LABEL);
        assert_eq!(popup_copy.label(), FAVORITED_LABEL);
        assert_eq!(other.label(), FAVORITED_LABEL);
        assert!(!clicked.is_disabled());
        assert!(h.notifier.notices.borrow().is_empty());
    }

    #[test]
    fn successful_remove_is_the_inverse() {
        let clicked = FakeButton::bound("123", FAVORITED_LABEL);
        let h = harness(
            &["123", "999"],
            ScriptedTransport::answering("ok"),
            &[clicked.clone()],
        );

        let outcome = block_on(h.state.toggle(&clicked, "123"));

        assert_eq!(outcome, Ok(ToggleOutcome::Applied(FavoriteAction::Remove)));
        assert!(!h.state.favorites().contains("123"));
        assert!(h.state.favorites().contains("999"));
        assert_eq!(clicked.label(), NOT_FAVORITED_LABEL);
    }

    #[test]
    fn action_comes_from_set_not_from_label() {
        // Stale label claims favorited, but the set says otherwise.
        let clicked = FakeButton::bound("123", FAVORITED_LABEL);
        let h = harness(&[], ScriptedTransport::answering("ok"), &[clicked.clone()]);

        block_on(h.state.toggle(&clicked, "123")).unwrap();

        assert_eq!(h.transport.calls.borrow()[0].0, FavoriteAction::Add);
        assert_eq!(clicked.label(), FAVORITED_LABEL);
    }

    #[test]
    fn disabled_button_is_skipped_without_request() {
        let clicked = FakeButton::bound("123", NOT_FAVORITED_LABEL);
        clicked.disabled.set(true);
        let h = harness(&[], ScriptedTransport::answering("ok"), &[clicked.clone()]);

        let outcome = block_on(h.state.toggle(&clicked, "123"));

        assert_eq!(outcome, Ok(ToggleOutcome::Skipped));
        assert!(h.transport.calls.borrow().is_empty());
        assert!(h.state.favorites().snapshot().is_empty());
        assert!(clicked.is_disabled());
        assert!(h.notifier.notices.borrow().is_empty());
    }

    #[test]
    fn logical_failure_changes_nothing_and_reenables() {
        let clicked = FakeButton::bound("123", NOT_FAVORITED_LABEL);
        let h = harness(
            &[],
            ScriptedTransport::answering("error"),
            &[clicked.clone()],
        );

        let outcome = block_on(h.state.toggle(&clicked, "123"));

        assert_eq!(
            outcome,
            Err(ToggleError::Rejected {
                status: "error".into()
            })
        );
        assert_eq!(clicked.label(), NOT_FAVORITED_LABEL);
        assert!(!h.state.favorites().contains("123"));
        assert!(!clicked.is_disabled());
        assert_eq!(*h.notifier.notices.borrow(), vec![Notice::FavoriteRejected]);
    }

    #[test]
    fn network_failure_uses_distinct_notice() {
        let clicked = FakeButton::bound("123", NOT_FAVORITED_LABEL);
        let h = harness(
            &[],
            ScriptedTransport::with_result(Err(TransportError::Network("offline".into()))),
            &[clicked.clone()],
        );

        let outcome = block_on(h.state.toggle(&clicked, "123"));

        assert!(matches!(outcome, Err(ToggleError::Transport(_))));
        assert_eq!(clicked.label(), NOT_FAVORITED_LABEL);
        assert!(h.state.favorites().snapshot().is_empty());
        assert!(!clicked.is_disabled());
        assert_eq!(*h.notifier.notices.borrow(), vec![Notice::FavoriteFailed]);
    }

    #[test]
    fn timeout_counts_as_network_failure() {
        let clicked = FakeButton::bound("1", NOT_FAVORITED_LABEL);
        let h = harness(
            &[],
            ScriptedTransport::with_result(Err(TransportError::Timeout { after_ms: 10 })),
            &[clicked.clone()],
        );

        let _ = block_on(h.state.toggle(&clicked, "1"));

        assert_eq!(*h.notifier.notices.borrow(), vec![Notice::FavoriteFailed]);
        assert!(!clicked.is_disabled());
    }

    #[test]
    fn button_is_disabled_while_request_is_in_flight() {
        let clicked = FakeButton::bound("123", NOT_FAVORITED_LABEL);
        let transport = ScriptedTransport::answering("ok").watching(&clicked);
        let h = harness(&[], transport, &[clicked.clone()]);

        block_on(h.state.toggle(&clicked, "123")).unwrap();

        assert_eq!(*h.transport.disabled_during_call.borrow(), vec![true]);
        assert_eq!(*clicked.disabled_history.borrow(), vec![true, false]);
    }

    #[test]
    fn unauthenticated_user_is_told_to_log_in() {
        let clicked = FakeButton::bound("123", NOT_FAVORITED_LABEL);
        let notifier = RecordingNotifier::default();
        let transport = ScriptedTransport::answering("ok");
        let state = FavoriteState::new(
            FavoriteStore::default(),
            transport.clone(),
            FakeSurface::with(&[clicked.clone()]),
            notifier.clone(),
        )
        .with_authentication(false);

        let outcome = block_on(state.toggle(&clicked, "123"));

        assert_eq!(outcome, Ok(ToggleOutcome::LoginRequired));
        assert!(transport.calls.borrow().is_empty());
        assert!(!clicked.is_disabled());
        assert_eq!(*notifier.notices.borrow(), vec![Notice::LoginRequired]);
    }

    #[test]
    fn refresh_is_idempotent() {
        let a = FakeButton::bound("1", NOT_FAVORITED_LABEL);
        let b = FakeButton::bound("2", FAVORITED_LABEL);
        let surface = FakeSurface::with(&[a.clone(), b.clone()]);
        let favorites = FavoriteSet::from_ids(["1"]);

        assert_eq!(refresh_buttons(&surface, &favorites), 2);
        let first = (a.label(), b.label());
        assert_eq!(refresh_buttons(&surface, &favorites), 2);
        assert_eq!((a.label(), b.label()), first);
        assert_eq!(first, (FAVORITED_LABEL.to_string(), NOT_FAVORITED_LABEL.to_string()));
    }

    #[test]
    fn refresh_skips_unbound_buttons_and_empty_pages() {
        let unbound = FakeButton {
            label: Rc::new(RefCell::new("custom".into())),
            ..FakeButton::default()
        };
        let surface = FakeSurface::with(&[unbound.clone()]);
        assert_eq!(refresh_buttons(&surface, &FavoriteSet::new()), 0);
        assert_eq!(unbound.label(), "custom");

        assert_eq!(refresh_buttons(&FakeSurface::default(), &FavoriteSet::new()), 0);
    }
}
