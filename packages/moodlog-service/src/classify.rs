use moodlog_domain::{MoodClassification, mood};
use moodlog_providers::completion;

use crate::JournalService;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClassifyRequest {
	pub content: String,
}

impl JournalService {
	/// Classifies `content` with the configured model.
	///
	/// Never fails: an upstream error or a reply of the wrong shape both resolve to
	/// [`MoodClassification::fallback`]. One outbound request per call, no retry, no cache.
	pub async fn classify(&self, content: &str) -> MoodClassification {
		let cfg = &self.cfg.providers.mood_classifier;
		let messages = [completion::user_message(&mood::classification_prompt(content))];
		let reply = match self.providers.completion.complete(cfg, &messages).await {
			Ok(reply) => reply,
			Err(err) => {
				tracing::warn!(
					error = %err,
					provider_id = cfg.provider_id.as_str(),
					model = cfg.model.as_str(),
					"Mood classification request failed. Using fallback."
				);

				return MoodClassification::fallback();
			},
		};

		match mood::parse_reply(&reply) {
			Some(classification) => {
				if !classification.is_known_label() {
					tracing::info!(
						mood = classification.mood.as_str(),
						"Model replied with an unlisted mood label."
					);
				}

				classification
			},
			None => {
				tracing::info!(
					reason = "unexpected reply shape",
					reply_chars = reply.chars().count(),
					"Mood reply does not match the expected shape. Using fallback."
				);

				MoodClassification::fallback()
			},
		}
	}

	pub async fn classify_entry(&self, req: ClassifyRequest) -> MoodClassification {
		self.classify(&req.content).await
	}
}
