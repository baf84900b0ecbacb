pub mod classify;
pub mod entries;
pub mod repository;
pub mod session;
pub mod time_serde;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;
use uuid::Uuid;

pub use classify::ClassifyRequest;
pub use entries::{EntryItem, ListResponse, SubmitEntryRequest, SubmitEntryResponse};
pub use error::{Error, Result};
use moodlog_config::{Config, LlmProviderConfig};
pub use moodlog_domain::{FilterCriteria, IntensityBand, MoodClassification, MoodFilter};
use moodlog_providers::completion;
pub use moodlog_storage::models::{JournalEntry, NewJournalEntry};
pub use repository::{MemoryEntryRepository, PgEntryRepository};
pub use session::{Identity, SessionEvent, SessionManager};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Chat-completion backend used by the mood classifier.
pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, moodlog_providers::Result<String>>;
}

/// Durable home of journal entries.
pub trait EntryRepository
where
	Self: Send + Sync,
{
	fn insert<'a>(&'a self, entry: NewJournalEntry) -> BoxFuture<'a, Result<Uuid>>;

	/// Entries of `owner_id` matching `filter`, newest first.
	fn query<'a>(
		&'a self,
		owner_id: Uuid,
		filter: &'a FilterCriteria,
	) -> BoxFuture<'a, Result<Vec<JournalEntry>>>;
}

/// Who is signed in right now.
pub trait IdentitySource
where
	Self: Send + Sync,
{
	fn current_user(&self) -> BoxFuture<'_, Result<Option<Identity>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub completion: Arc<dyn CompletionProvider>,
}

pub struct JournalService {
	pub cfg: Config,
	pub repository: Arc<dyn EntryRepository>,
	pub providers: Providers,
}

struct DefaultProviders;

impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, moodlog_providers::Result<String>> {
		Box::pin(completion::complete(cfg, messages))
	}
}

impl Providers {
	pub fn new(completion: Arc<dyn CompletionProvider>) -> Self {
		Self { completion }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { completion: Arc::new(DefaultProviders) }
	}
}

impl JournalService {
	pub fn new(cfg: Config, repository: Arc<dyn EntryRepository>) -> Self {
		Self { cfg, repository, providers: Providers::default() }
	}

	pub fn with_providers(
		cfg: Config,
		repository: Arc<dyn EntryRepository>,
		providers: Providers,
	) -> Self {
		Self { cfg, repository, providers }
	}
}
