use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JournalEntry {
	pub entry_id: Uuid,
	pub owner_id: Uuid,
	pub content: String,
	pub mood: String,
	pub intensity: i32,
	pub created_at: OffsetDateTime,
}

/// Row fields supplied by the caller; `entry_id` and `created_at` are assigned by Postgres.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
	pub owner_id: Uuid,
	pub content: String,
	pub mood: String,
	pub intensity: i32,
}

#[derive(Debug, Clone)]
pub struct EntryQuery {
	pub mood: Option<String>,
	pub min_intensity: i32,
	pub max_intensity: i32,
}
