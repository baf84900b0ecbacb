use std::sync::Mutex;

use time::OffsetDateTime;
use uuid::Uuid;

use moodlog_domain::{FilterCriteria, MAX_INTENSITY};
use moodlog_storage::{
	db::Db,
	models::{EntryQuery, JournalEntry, NewJournalEntry},
	queries,
};

use crate::{BoxFuture, EntryRepository, Error, Result};

pub struct PgEntryRepository {
	db: Db,
}
impl PgEntryRepository {
	pub fn new(db: Db) -> Self {
		Self { db }
	}

	pub fn db(&self) -> &Db {
		&self.db
	}
}

impl EntryRepository for PgEntryRepository {
	fn insert<'a>(&'a self, entry: NewJournalEntry) -> BoxFuture<'a, Result<Uuid>> {
		Box::pin(async move { Ok(queries::insert_entry(&self.db, &entry).await?) })
	}

	fn query<'a>(
		&'a self,
		owner_id: Uuid,
		filter: &'a FilterCriteria,
	) -> BoxFuture<'a, Result<Vec<JournalEntry>>> {
		Box::pin(async move {
			let query = EntryQuery {
				mood: filter.mood.label().map(str::to_string),
				min_intensity: i32::from(filter.min_intensity),
				max_intensity: i32::from(filter.max_intensity),
			};

			Ok(queries::list_entries(&self.db, owner_id, &query).await?)
		})
	}
}

/// Process-local repository for tests and storage-less runs.
#[derive(Default)]
pub struct MemoryEntryRepository {
	entries: Mutex<Vec<JournalEntry>>,
}
impl MemoryEntryRepository {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn insert_now(&self, entry: NewJournalEntry) -> Result<Uuid> {
		if entry.content.is_empty() {
			return Err(Error::InvalidRequest { message: "content must not be empty.".to_string() });
		}
		if !(0..=i32::from(MAX_INTENSITY)).contains(&entry.intensity) {
			return Err(Error::InvalidRequest {
				message: format!("intensity must be between 0 and 10, got {}.", entry.intensity),
			});
		}

		let entry_id = Uuid::new_v4();
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.push(JournalEntry {
			entry_id,
			owner_id: entry.owner_id,
			content: entry.content,
			mood: entry.mood,
			intensity: entry.intensity,
			created_at: OffsetDateTime::now_utc(),
		});

		Ok(entry_id)
	}

	fn query_now(&self, owner_id: Uuid, filter: &FilterCriteria) -> Vec<JournalEntry> {
		let entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
		// Walk newest insert first so the stable sort keeps later inserts ahead on equal timestamps.
		let mut matched = entries
			.iter()
			.rev()
			.filter(|entry| entry.owner_id == owner_id)
			.filter(|entry| {
				u8::try_from(entry.intensity)
					.map(|intensity| filter.matches(&entry.mood, intensity))
					.unwrap_or(false)
			})
			.cloned()
			.collect::<Vec<_>>();

		matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

		matched
	}
}

impl EntryRepository for MemoryEntryRepository {
	fn insert<'a>(&'a self, entry: NewJournalEntry) -> BoxFuture<'a, Result<Uuid>> {
		Box::pin(async move { self.insert_now(entry) })
	}

	fn query<'a>(
		&'a self,
		owner_id: Uuid,
		filter: &'a FilterCriteria,
	) -> BoxFuture<'a, Result<Vec<JournalEntry>>> {
		Box::pin(async move { Ok(self.query_now(owner_id, filter)) })
	}
}
