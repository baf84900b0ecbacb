use std::sync::RwLock;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{BoxFuture, IdentitySource, Result};

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Identity {
	pub user_id: Uuid,
	#[serde(default)]
	pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
	SignedIn(Identity),
	SignedOut,
}

/// Holds the signed-in identity and announces every change to subscribers.
pub struct SessionManager {
	current: RwLock<Option<Identity>>,
	events: broadcast::Sender<SessionEvent>,
}
impl SessionManager {
	pub fn new() -> Self {
		let (events, _) = broadcast::channel(EVENT_CAPACITY);

		Self { current: RwLock::new(None), events }
	}

	/// Replaces any existing identity.
	pub fn sign_in(&self, identity: Identity) {
		*self.current.write().unwrap_or_else(|err| err.into_inner()) = Some(identity.clone());

		tracing::info!(user_id = %identity.user_id, "Session signed in.");

		// No subscribers is fine.
		let _ = self.events.send(SessionEvent::SignedIn(identity));
	}

	/// Returns whether a session was actually ended.
	pub fn sign_out(&self) -> bool {
		let previous = self.current.write().unwrap_or_else(|err| err.into_inner()).take();
		let Some(identity) = previous else {
			return false;
		};

		tracing::info!(user_id = %identity.user_id, "Session signed out.");

		let _ = self.events.send(SessionEvent::SignedOut);

		true
	}

	pub fn current_user(&self) -> Option<Identity> {
		self.current.read().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn on_change(&self) -> broadcast::Receiver<SessionEvent> {
		self.events.subscribe()
	}
}
impl Default for SessionManager {
	fn default() -> Self {
		Self::new()
	}
}

impl IdentitySource for SessionManager {
	fn current_user(&self) -> BoxFuture<'_, Result<Option<Identity>>> {
		let identity = SessionManager::current_user(self);

		Box::pin(async move { Ok(identity) })
	}
}
