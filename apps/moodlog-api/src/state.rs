use std::sync::Arc;

use moodlog_service::{EntryRepository, JournalService, PgEntryRepository, SessionManager};
use moodlog_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<JournalService>,
	pub session: Arc<SessionManager>,
}
impl AppState {
	pub async fn new(config: moodlog_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let repository: Arc<dyn EntryRepository> = Arc::new(PgEntryRepository::new(db));
		let service = JournalService::new(config, repository);

		Ok(Self::from_parts(service, SessionManager::new()))
	}

	pub fn from_parts(service: JournalService, session: SessionManager) -> Self {
		Self { service: Arc::new(service), session: Arc::new(session) }
	}
}
