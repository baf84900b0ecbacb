use axum::{
	Json, Router,
	extract::{Query, State, rejection::QueryRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing,
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use moodlog_service::{
	ClassifyRequest, Error as ServiceError, FilterCriteria, Identity, IntensityBand, ListResponse,
	MoodClassification, MoodFilter, SubmitEntryRequest, SubmitEntryResponse,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", routing::get(health))
		.route("/v1/session", routing::post(sign_in).get(current_session).delete(sign_out))
		.route("/v1/moods/classify", routing::post(classify))
		.route("/v1/entries", routing::post(submit_entry).get(list_entries))
		.with_state(state)
}

#[derive(Debug, Serialize)]
pub struct SignOutResponse {
	pub signed_out: bool,
}

/// Query string of `GET /v1/entries`. `band` is shorthand for a preset intensity range and
/// cannot be combined with explicit bounds.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
	pub mood: Option<String>,
	pub min_intensity: Option<u8>,
	pub max_intensity: Option<u8>,
	pub band: Option<IntensityBand>,
}
impl ListQuery {
	fn into_filter(self) -> Result<FilterCriteria, ApiError> {
		let mut filter = FilterCriteria {
			mood: self.mood.as_deref().map(MoodFilter::parse).unwrap_or_default(),
			..Default::default()
		};

		if let Some(band) = self.band {
			if self.min_intensity.is_some() || self.max_intensity.is_some() {
				return Err(json_error(
					StatusCode::BAD_REQUEST,
					"INVALID_REQUEST",
					"band cannot be combined with min_intensity or max_intensity.",
					Some(vec!["band".to_string()]),
				));
			}

			(filter.min_intensity, filter.max_intensity) = band.bounds();

			return Ok(filter);
		}

		if let Some(min) = self.min_intensity {
			filter.min_intensity = min;
		}
		if let Some(max) = self.max_intensity {
			filter.max_intensity = max;
		}

		Ok(filter)
	}
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn sign_in(State(state): State<AppState>, Json(payload): Json<Identity>) -> Json<Identity> {
	state.session.sign_in(payload.clone());

	Json(payload)
}

async fn current_session(State(state): State<AppState>) -> Json<Option<Identity>> {
	Json(state.session.current_user())
}

async fn sign_out(State(state): State<AppState>) -> Json<SignOutResponse> {
	Json(SignOutResponse { signed_out: state.session.sign_out() })
}

async fn classify(
	State(state): State<AppState>,
	Json(payload): Json<ClassifyRequest>,
) -> Json<MoodClassification> {
	Json(state.service.classify_entry(payload).await)
}

async fn submit_entry(
	State(state): State<AppState>,
	Json(payload): Json<SubmitEntryRequest>,
) -> Result<Json<SubmitEntryResponse>, ApiError> {
	let response = state.service.submit_entry(state.session.as_ref(), payload).await?;

	Ok(Json(response))
}

async fn list_entries(
	State(state): State<AppState>,
	query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError> {
	let Query(query) = query.map_err(|rejection| {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", rejection.body_text(), None)
	})?;
	let filter = query.into_filter()?;
	let response = state.service.list_entries(state.session.as_ref(), filter).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } => {
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None)
			},
			ServiceError::Unauthenticated { message } => {
				json_error(StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", message, None)
			},
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Journal storage failed.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"STORAGE_ERROR",
					"Journal storage is unavailable.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
