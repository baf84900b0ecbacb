use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Labels advertised to the model. Replies are not checked against this list.
pub const MOOD_LABELS: [&str; 6] = ["happy", "sad", "neutral", "angry", "fearful", "surprised"];
pub const MIN_INTENSITY: u8 = 0;
pub const MAX_INTENSITY: u8 = 10;
pub const FALLBACK_MOOD: &str = "neutral";
pub const FALLBACK_INTENSITY: u8 = 5;

const BYTE_ORDER_MARK: char = '\u{feff}';

// The whole normalized reply must be one lowercase word, optional whitespace, then one or two
// ASCII digits. A byte order mark counts as whitespace.
static REPLY_PATTERN: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^([a-z]+)[\s\x{FEFF}]*([0-9]{1,2})$").ok());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodClassification {
	pub mood: String,
	pub intensity: u8,
}
impl MoodClassification {
	pub fn new(mood: impl Into<String>, intensity: i64) -> Self {
		Self { mood: mood.into(), intensity: clamp_intensity(intensity) }
	}

	/// The value used whenever a reply cannot be trusted.
	pub fn fallback() -> Self {
		Self { mood: FALLBACK_MOOD.to_string(), intensity: FALLBACK_INTENSITY }
	}

	pub fn is_known_label(&self) -> bool {
		MOOD_LABELS.contains(&self.mood.as_str())
	}
}

pub fn classification_prompt(content: &str) -> String {
	format!(
		"Analyze the mood of the following journal entry. Respond with ONLY one keyword and a numeric intensity from {MIN_INTENSITY} to {MAX_INTENSITY}: ({}).\n\nEntry:\n{content}",
		MOOD_LABELS.join(", "),
	)
}

/// Parses a raw model reply into a classification.
///
/// The reply is lower-cased and trimmed of whitespace and byte order marks, then matched as a
/// whole against `^[a-z]+\s*[0-9]{1,2}$`. Any other shape yields `None`; the caller decides the fallback.
/// The intensity is clamped into `MIN_INTENSITY..=MAX_INTENSITY`.
pub fn parse_reply(raw: &str) -> Option<MoodClassification> {
	let normalized = raw.to_lowercase();
	let trimmed = normalized.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK);
	let captures = REPLY_PATTERN.as_ref()?.captures(trimmed)?;
	let mood = captures.get(1)?.as_str();
	let value: i64 = captures.get(2)?.as_str().parse().ok()?;

	Some(MoodClassification::new(mood, value))
}

pub fn clamp_intensity(value: i64) -> u8 {
	value.clamp(i64::from(MIN_INTENSITY), i64::from(MAX_INTENSITY)) as u8
}
