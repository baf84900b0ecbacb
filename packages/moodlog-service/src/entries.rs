use time::OffsetDateTime;
use uuid::Uuid;

use moodlog_domain::FilterCriteria;
use moodlog_storage::models::{JournalEntry, NewJournalEntry};

use crate::{Error, IdentitySource, JournalService, Result};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SubmitEntryRequest {
	pub content: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SubmitEntryResponse {
	pub entry_id: Uuid,
	pub mood: String,
	pub intensity: u8,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EntryItem {
	pub entry_id: Uuid,
	pub content: String,
	pub mood: String,
	pub intensity: u8,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListResponse {
	pub items: Vec<EntryItem>,
}

impl JournalService {
	/// Classifies, resolves the signed-in user, then persists; strictly in that order.
	pub async fn submit_entry(
		&self,
		session: &dyn IdentitySource,
		req: SubmitEntryRequest,
	) -> Result<SubmitEntryResponse> {
		if req.content.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "content must not be empty.".to_string() });
		}

		let classification = self.classify(&req.content).await;
		let Some(identity) = session.current_user().await? else {
			return Err(Error::Unauthenticated { message: "User not found.".to_string() });
		};
		let entry_id = self
			.repository
			.insert(NewJournalEntry {
				owner_id: identity.user_id,
				content: req.content,
				mood: classification.mood.clone(),
				intensity: i32::from(classification.intensity),
			})
			.await?;

		tracing::info!(
			%entry_id,
			owner_id = %identity.user_id,
			mood = classification.mood.as_str(),
			intensity = classification.intensity,
			"Journal entry saved."
		);

		Ok(SubmitEntryResponse {
			entry_id,
			mood: classification.mood,
			intensity: classification.intensity,
		})
	}

	pub async fn list_entries(
		&self,
		session: &dyn IdentitySource,
		filter: FilterCriteria,
	) -> Result<ListResponse> {
		filter.validate()?;

		let Some(identity) = session.current_user().await? else {
			return Err(Error::Unauthenticated { message: "User not found.".to_string() });
		};
		let entries = self.repository.query(identity.user_id, &filter).await?;
		let items = entries.into_iter().map(entry_item).collect::<Result<Vec<_>>>()?;

		Ok(ListResponse { items })
	}
}

fn entry_item(entry: JournalEntry) -> Result<EntryItem> {
	let intensity = u8::try_from(entry.intensity).map_err(|_| Error::Storage {
		message: format!("Stored intensity {} is out of range.", entry.intensity),
	})?;

	Ok(EntryItem {
		entry_id: entry.entry_id,
		content: entry.content,
		mood: entry.mood,
		intensity,
		created_at: entry.created_at,
	})
}
