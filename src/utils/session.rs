use tracing::warn;
use uuid::Uuid;

use crate::utils::state::AppState;

/// Session lifecycle notifications from the authentication collaborator. The
/// auth handlers are the only emitters; this funnel is the only writer of the
/// per-user favorite cache besides the favorite gesture itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    TokenRefreshed,
    SignedOut,
}

pub async fn on_session_event(state: &AppState, event: SessionEvent, user_id: Uuid) {
    match event {
        SessionEvent::SignedIn | SessionEvent::TokenRefreshed => {
            match state.store.favorites_for_user(user_id).await {
                Ok(ids) => state.set_favorites(user_id, ids.into_iter().collect()),
                // Keep whatever set we had; the next event reloads it.
                Err(error) => warn!(%error, %user_id, "favorite set not reloaded"),
            }
        }
        SessionEvent::SignedOut => state.clear_favorites(user_id),
    }
}
