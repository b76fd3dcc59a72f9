//! Video modules, quizzes and the supervisor's daily star module.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;

use crate::auth::Role;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::Identity;
use crate::repos::modules::{self, Question, VideoModule, VideoModuleCreate};
use crate::repos::{completions, users};
use crate::services::users::format_day;

#[derive(Debug, Serialize)]
pub struct ModuleView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub duration: i32,
    pub category: String,
    pub thumbnail: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<VideoModule> for ModuleView {
    fn from(m: VideoModule) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            video_url: m.video_url,
            duration: m.duration,
            category: m.category,
            thumbnail: m.thumbnail,
            is_active: m.is_active,
            created_by: m.created_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: i64,
    pub video_id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub answer: i32,
}

impl TryFrom<Question> for QuestionView {
    type Error = AppError;

    fn try_from(q: Question) -> Result<Self, Self::Error> {
        Ok(Self {
            options: serde_json::from_str(&q.options)?,
            id: q.id,
            video_id: q.video_id,
            question: q.question,
            answer: q.answer,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ModuleCreateRequest {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub duration: i32,
    pub category: String,
    pub thumbnail: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QuestionCreateRequest {
    pub video_id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub answer: i32,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswersRequest {
    pub video_id: i64,
    #[serde(default)]
    pub answers: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct StarSet {
    pub message: &'static str,
    pub video_id: i64,
    pub star_id: i64,
    pub set_date: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct SubmitResult {
    pub completion_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub score: i32,
    pub total: i32,
}

impl QuizScore {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.score) / f64::from(self.total) * 100.0
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScoreError {
    #[error("No questions found for this video")]
    NoQuestions,
    #[error("Answer count doesn't match question count")]
    AnswerCountMismatch,
}

/// Compare `given[i]` with `correct[i]`; both are in question-id order.
pub fn score_answers(correct: &[i32], given: &[i32]) -> Result<QuizScore, ScoreError> {
    if correct.is_empty() {
        return Err(ScoreError::NoQuestions);
    }
    if correct.len() != given.len() {
        return Err(ScoreError::AnswerCountMismatch);
    }
    let score = correct.iter().zip(given).filter(|(c, g)| c == g).count();
    Ok(QuizScore {
        score: score as i32,
        total: correct.len() as i32,
    })
}

fn module_not_found() -> AppError {
    AppError::not_found(ErrorCode::ModuleNotFound, "Video module not found")
}

fn no_star_today() -> AppError {
    AppError::not_found(ErrorCode::StarVideoNotSet, "No star video set for today")
}

pub async fn create_module<C: ConnectionTrait>(
    conn: &C,
    created_by: &str,
    req: ModuleCreateRequest,
) -> Result<ModuleView, AppError> {
    if req.title.trim().is_empty() || req.video_url.trim().is_empty() {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "Title and video URL are required",
        ));
    }

    let module = modules::create_module(
        conn,
        VideoModuleCreate {
            title: req.title.trim().to_string(),
            description: req.description,
            video_url: req.video_url.trim().to_string(),
            duration: req.duration.max(0),
            category: req.category,
            thumbnail: req.thumbnail,
            created_by: Some(created_by.to_string()),
        },
    )
    .await?;

    info!(module_id = module.id, created_by, "video module created");
    Ok(module.into())
}

pub async fn list_modules<C: ConnectionTrait>(conn: &C) -> Result<Vec<ModuleView>, AppError> {
    let rows = modules::list_active(conn).await?;
    Ok(rows.into_iter().map(ModuleView::from).collect())
}

pub async fn get_module<C: ConnectionTrait>(conn: &C, id: i64) -> Result<ModuleView, AppError> {
    modules::find_module(conn, id)
        .await?
        .map(ModuleView::from)
        .ok_or_else(module_not_found)
}

pub async fn set_star<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
    video_id: i64,
    now: OffsetDateTime,
) -> Result<StarSet, AppError> {
    modules::find_module(conn, video_id)
        .await?
        .ok_or_else(module_not_found)?;

    let star = modules::set_star(conn, supervisor_id, video_id, now.date()).await?;
    info!(supervisor_id, video_id, "star video set");

    Ok(StarSet {
        message: "Star video set successfully",
        video_id: star.video_id,
        star_id: star.id,
        set_date: format_day(star.set_date),
        is_active: star.is_active,
    })
}

/// Today's star module for the caller: a supervisor's own pick, or the pick
/// of the caller's supervisor.
pub async fn get_star<C: ConnectionTrait>(
    conn: &C,
    caller: &Identity,
    now: OffsetDateTime,
) -> Result<ModuleView, AppError> {
    let supervisor_id = match caller.role {
        Role::Supervisor => caller.subject_id.clone(),
        Role::Miner | Role::Admin => users::find_by_user_id(conn, &caller.subject_id)
            .await?
            .and_then(|u| u.supervisor_id)
            .ok_or_else(no_star_today)?,
    };

    let star = modules::active_star_for_day(conn, &supervisor_id, now.date())
        .await?
        .ok_or_else(no_star_today)?;

    modules::find_module(conn, star.video_id)
        .await?
        .map(ModuleView::from)
        .ok_or_else(no_star_today)
}

pub async fn create_question<C: ConnectionTrait>(
    conn: &C,
    req: QuestionCreateRequest,
) -> Result<QuestionView, AppError> {
    if req.question.trim().is_empty() || req.options.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "Question and options are required",
        ));
    }
    if req.answer < 0 || req.answer as usize >= req.options.len() {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "Answer must be the index of one of the options",
        ));
    }

    modules::find_module(conn, req.video_id)
        .await?
        .ok_or_else(module_not_found)?;

    let options_json = serde_json::to_string(&req.options)?;
    let question = modules::create_question(
        conn,
        req.video_id,
        req.question.trim().to_string(),
        options_json,
        req.answer,
    )
    .await?;
    QuestionView::try_from(question)
}

pub async fn get_questions<C: ConnectionTrait>(
    conn: &C,
    video_id: i64,
) -> Result<Vec<QuestionView>, AppError> {
    modules::questions_for(conn, video_id)
        .await?
        .into_iter()
        .map(QuestionView::try_from)
        .collect()
}

pub async fn submit_answers<C: ConnectionTrait>(
    conn: &C,
    miner_id: &str,
    req: SubmitAnswersRequest,
    now: OffsetDateTime,
) -> Result<SubmitResult, AppError> {
    let questions = modules::questions_for(conn, req.video_id).await?;
    let correct: Vec<i32> = questions.iter().map(|q| q.answer).collect();

    let result = score_answers(&correct, &req.answers)
        .map_err(|e| AppError::invalid(ErrorCode::ValidationError, e.to_string()))?;

    let completion = completions::record(
        conn,
        miner_id,
        req.video_id,
        result.score,
        result.total,
        now,
    )
    .await?;

    info!(
        miner_id,
        video_id = req.video_id,
        score = result.score,
        total = result.total,
        "module completed"
    );

    Ok(SubmitResult {
        completion_id: completion.id,
        score: result.score,
        total_questions: result.total,
        percentage: result.percentage(),
        message: "Module completed successfully",
    })
}
