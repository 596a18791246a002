//! Question endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use truthordare_core::models::tag::TAG_SEPARATOR;
use truthordare_core::{NewQuestion, Question, QueryCriteria, ValidationError};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Raw `GET /api/questions` filters
///
/// `tags` may repeat and each value may itself be a comma-separated list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub language: String,
    pub kind: String,
    pub tags: Vec<String>,
    pub match_all: bool,
}

impl QuestionFilter {
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ValidationError> {
        let mut filter = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "language" => filter.language = value.clone(),
                "type" => filter.kind = value.clone(),
                "tags" | "tags[]" => filter.tags.extend(
                    value
                        .split(TAG_SEPARATOR)
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_owned),
                ),
                "matchAllTags" => filter.match_all = parse_flag(value)?,
                _ => {}
            }
        }
        Ok(filter)
    }

    pub fn into_criteria(self) -> Result<QueryCriteria, ValidationError> {
        QueryCriteria::from_raw(&self.language, &self.kind, self.tags.as_slice(), self.match_all)
    }
}

fn parse_flag(value: &str) -> Result<bool, ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "" | "false" | "0" => Ok(false),
        _ => Err(ValidationError::InvalidVariant {
            field: "matchAllTags",
            value: value.to_owned(),
        }),
    }
}

/// Create question request
#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub language: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub task: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Created question response
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// GET /api/questions - questions matching the query filters
async fn list_questions(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let criteria = QuestionFilter::from_pairs(&pairs)?.into_criteria()?;
    let questions = state.store.find_questions(&criteria).await?;
    Ok(Json(questions))
}

/// POST /api/questions - create a question with its tags
async fn create_question(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateQuestionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let Json(req) = payload?;
    let question = NewQuestion::new(&req.language, &req.kind, &req.task, req.tags.as_slice())?;
    let id = state.store.create_question(&question).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Question routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/questions", get(list_questions).post(create_question))
}
