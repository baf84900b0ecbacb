pub mod filter;
pub mod mood;

pub use filter::{FilterCriteria, FilterError, IntensityBand, MoodFilter};
pub use mood::{
	FALLBACK_INTENSITY, FALLBACK_MOOD, MAX_INTENSITY, MIN_INTENSITY, MOOD_LABELS,
	MoodClassification,
};
