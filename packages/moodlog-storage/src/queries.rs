use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::{
	Error, Result,
	db::Db,
	models::{EntryQuery, JournalEntry, NewJournalEntry},
};

pub async fn insert_entry(db: &Db, entry: &NewJournalEntry) -> Result<Uuid> {
	if entry.content.is_empty() {
		return Err(Error::InvalidArgument("content must not be empty.".to_string()));
	}
	if !(0..=10).contains(&entry.intensity) {
		return Err(Error::InvalidArgument(format!(
			"intensity must be between 0 and 10, got {}.",
			entry.intensity
		)));
	}

	let entry_id: Uuid = sqlx::query_scalar(
		"\
INSERT INTO journal_entries (
	owner_id,
	content,
	mood,
	intensity
)
VALUES ($1, $2, $3, $4)
RETURNING entry_id",
	)
	.bind(entry.owner_id)
	.bind(entry.content.as_str())
	.bind(entry.mood.as_str())
	.bind(entry.intensity)
	.fetch_one(&db.pool)
	.await?;

	Ok(entry_id)
}

pub async fn list_entries(
	db: &Db,
	owner_id: Uuid,
	query: &EntryQuery,
) -> Result<Vec<JournalEntry>> {
	let mut builder = QueryBuilder::new(
		"SELECT entry_id, owner_id, content, mood, intensity, created_at \
		 FROM journal_entries WHERE owner_id = ",
	);

	builder.push_bind(owner_id);

	if let Some(mood) = &query.mood {
		builder.push(" AND mood = ");
		builder.push_bind(mood.as_str());
	}

	builder.push(" AND intensity >= ");
	builder.push_bind(query.min_intensity);
	builder.push(" AND intensity <= ");
	builder.push_bind(query.max_intensity);
	builder.push(" ORDER BY created_at DESC, entry_id DESC");

	let entries: Vec<JournalEntry> = builder.build_query_as().fetch_all(&db.pool).await?;

	Ok(entries)
}
