//! Learning streaks, the quiz calendar and completion history.
//!
//! Day arithmetic happens here rather than in SQL so Postgres and SQLite
//! agree on what a "day" is (UTC calendar days).

use std::collections::{BTreeSet, HashMap};

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::{Date, Duration, OffsetDateTime};

use crate::error::AppError;
use crate::repos::completions::{self, Completion};
use crate::repos::modules;
use crate::repos::users::{self, User};
use crate::services::users::{format_day, get_user};

/// Trailing window for the supervisor streak view.
pub const STREAK_WINDOW: Duration = Duration::days(30);
const HISTORY_LIMIT: u64 = 50;

#[derive(Debug, Serialize, PartialEq)]
pub struct LearningStreak {
    pub miner_id: String,
    pub miner_name: String,
    pub current_streak: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub last_completed: OffsetDateTime,
    pub total_modules: u32,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CalendarStreak {
    pub user_id: String,
    pub user_name: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_days: u32,
    /// Newest first, `YYYY-MM-DD`.
    pub attempt_dates: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CompletionView {
    pub id: i64,
    pub miner_id: String,
    pub video_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
    pub score: i32,
    pub total_questions: i32,
    pub video_title: String,
    pub percentage: f64,
}

/// Distinct UTC days, newest first.
pub fn attempt_days<'a>(stamps: impl IntoIterator<Item = &'a OffsetDateTime>) -> Vec<Date> {
    let days: BTreeSet<Date> = stamps.into_iter().map(|t| t.date()).collect();
    days.into_iter().rev().collect()
}

/// Consecutive days ending at the newest entry, counted only when that entry
/// is `today` or the day before. `days` must be distinct and newest first.
pub fn current_streak(days: &[Date], today: Date) -> u32 {
    let Some(&newest) = days.first() else {
        return 0;
    };
    if newest != today && Some(newest) != today.previous_day() {
        return 0;
    }
    1 + run_length(days)
}

/// Longest run of consecutive days. `days` must be distinct and newest first.
pub fn longest_streak(days: &[Date]) -> u32 {
    if days.is_empty() {
        return 0;
    }
    let mut longest = 1;
    let mut current = 1;
    for pair in days.windows(2) {
        if pair[0].previous_day() == Some(pair[1]) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
    }
    longest
}

/// Number of consecutive steps from the head of `days`.
fn run_length(days: &[Date]) -> u32 {
    days.windows(2)
        .take_while(|pair| pair[0].previous_day() == Some(pair[1]))
        .count() as u32
}

/// Streak summary over completions already restricted to the trailing window.
pub fn learning_streak(miner: &User, recent: &[&Completion]) -> LearningStreak {
    let days = attempt_days(recent.iter().map(|c| &c.completed_at));
    LearningStreak {
        miner_id: miner.user_id.clone(),
        miner_name: miner.name.clone(),
        current_streak: days.len() as u32,
        last_completed: recent
            .iter()
            .map(|c| c.completed_at)
            .max()
            .unwrap_or(miner.created_at),
        total_modules: recent.len() as u32,
    }
}

/// Per-miner streaks for a supervisor, longest streak first, then by name.
pub async fn learning_streaks<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
    now: OffsetDateTime,
) -> Result<Vec<LearningStreak>, AppError> {
    let miners = users::list_miners(conn, supervisor_id).await?;
    let ids = miners.iter().map(|m| m.user_id.clone()).collect();
    let recent = completions::for_miners_since(conn, ids, now - STREAK_WINDOW).await?;

    let mut by_miner: HashMap<&str, Vec<&Completion>> = HashMap::new();
    for c in &recent {
        by_miner.entry(c.miner_id.as_str()).or_default().push(c);
    }

    let mut streaks: Vec<LearningStreak> = miners
        .iter()
        .map(|m| {
            let rows = by_miner.get(m.user_id.as_str()).map(Vec::as_slice);
            learning_streak(m, rows.unwrap_or_default())
        })
        .collect();
    streaks.sort_by(|a, b| {
        b.current_streak
            .cmp(&a.current_streak)
            .then_with(|| a.miner_name.cmp(&b.miner_name))
    });
    Ok(streaks)
}

pub async fn my_streak<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    now: OffsetDateTime,
) -> Result<LearningStreak, AppError> {
    let user = get_user(conn, user_id).await?;
    let recent =
        completions::for_miners_since(conn, vec![user.user_id.clone()], now - STREAK_WINDOW)
            .await?;
    let refs: Vec<&Completion> = recent.iter().collect();
    Ok(learning_streak(&user, &refs))
}

pub async fn calendar<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    now: OffsetDateTime,
) -> Result<CalendarStreak, AppError> {
    let user = get_user(conn, user_id).await?;
    let all = completions::for_miners(conn, vec![user.user_id.clone()]).await?;
    let days = attempt_days(all.iter().map(|c| &c.completed_at));

    Ok(CalendarStreak {
        user_id: user.user_id,
        user_name: user.name,
        current_streak: current_streak(&days, now.date()),
        longest_streak: longest_streak(&days),
        total_days: days.len() as u32,
        attempt_dates: days.into_iter().map(format_day).collect(),
    })
}

/// The caller's 50 most recent completions with module titles.
pub async fn my_completions<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
) -> Result<Vec<CompletionView>, AppError> {
    let rows = completions::recent_for_miner(conn, user_id, HISTORY_LIMIT).await?;
    let mut video_ids: Vec<i64> = rows.iter().map(|c| c.video_id).collect();
    video_ids.sort_unstable();
    video_ids.dedup();

    let titles: HashMap<i64, String> = modules::find_modules(conn, video_ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m.title))
        .collect();

    Ok(rows
        .into_iter()
        .map(|c| {
            let percentage = if c.total_questions > 0 {
                f64::from(c.score) / f64::from(c.total_questions) * 100.0
            } else {
                0.0
            };
            CompletionView {
                video_title: titles.get(&c.video_id).cloned().unwrap_or_default(),
                percentage,
                id: c.id,
                miner_id: c.miner_id,
                video_id: c.video_id,
                completed_at: c.completed_at,
                score: c.score,
                total_questions: c.total_questions,
            }
        })
        .collect())
}
