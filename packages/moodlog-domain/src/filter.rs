use serde::{Deserialize, Serialize};

use crate::mood::{MAX_INTENSITY, MIN_INTENSITY};

const ALL_MOODS: &str = "all";

/// Built through [`MoodFilter::parse`], which never yields an empty label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MoodFilter {
	#[default]
	All,
	Label(String),
}
impl MoodFilter {
	pub fn parse(raw: &str) -> Self {
		let normalized = raw.trim().to_lowercase();

		if normalized.is_empty() || normalized == ALL_MOODS {
			Self::All
		} else {
			Self::Label(normalized)
		}
	}

	pub fn label(&self) -> Option<&str> {
		match self {
			Self::All => None,
			Self::Label(label) => Some(label.as_str()),
		}
	}
}
impl From<String> for MoodFilter {
	fn from(raw: String) -> Self {
		Self::parse(&raw)
	}
}
impl From<MoodFilter> for String {
	fn from(filter: MoodFilter) -> Self {
		match filter {
			MoodFilter::All => ALL_MOODS.to_string(),
			MoodFilter::Label(label) => label,
		}
	}
}

/// Preset intensity ranges offered next to the free-form bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityBand {
	Low,
	Medium,
	High,
}
impl IntensityBand {
	pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

	pub fn bounds(self) -> (u8, u8) {
		match self {
			Self::Low => (0, 3),
			Self::Medium => (4, 6),
			Self::High => (7, 10),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
	#[error("{field} must be between 0 and 10, got {value}.")]
	IntensityOutOfRange { field: &'static str, value: u8 },
	#[error("min_intensity ({min}) must not exceed max_intensity ({max}).")]
	InvertedRange { min: u8, max: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
	#[serde(default)]
	pub mood: MoodFilter,
	#[serde(default = "default_min_intensity")]
	pub min_intensity: u8,
	#[serde(default = "default_max_intensity")]
	pub max_intensity: u8,
}
impl FilterCriteria {
	pub fn validate(&self) -> Result<(), FilterError> {
		for (field, value) in
			[("min_intensity", self.min_intensity), ("max_intensity", self.max_intensity)]
		{
			if value > MAX_INTENSITY {
				return Err(FilterError::IntensityOutOfRange { field, value });
			}
		}

		if self.min_intensity > self.max_intensity {
			return Err(FilterError::InvertedRange {
				min: self.min_intensity,
				max: self.max_intensity,
			});
		}

		Ok(())
	}

	/// Mood equality (skipped for `all`) and inclusive intensity range.
	pub fn matches(&self, mood: &str, intensity: u8) -> bool {
		let mood_ok = self.mood.label().map(|label| label == mood).unwrap_or(true);

		mood_ok && (self.min_intensity..=self.max_intensity).contains(&intensity)
	}

	pub fn active_band(&self) -> Option<IntensityBand> {
		IntensityBand::ALL
			.into_iter()
			.find(|band| band.bounds() == (self.min_intensity, self.max_intensity))
	}

	/// Selects `band`, or resets the range when `band` is already selected.
	pub fn toggle_band(&mut self, band: IntensityBand) {
		if self.active_band() == Some(band) {
			self.clear_intensity();
		} else {
			(self.min_intensity, self.max_intensity) = band.bounds();
		}
	}

	pub fn clear_intensity(&mut self) {
		self.min_intensity = MIN_INTENSITY;
		self.max_intensity = MAX_INTENSITY;
	}
}
impl Default for FilterCriteria {
	fn default() -> Self {
		Self { mood: MoodFilter::All, min_intensity: MIN_INTENSITY, max_intensity: MAX_INTENSITY }
	}
}

fn default_min_intensity() -> u8 {
	MIN_INTENSITY
}

fn default_max_intensity() -> u8 {
	MAX_INTENSITY
}
