use std::collections::HashSet;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::error::AppError;
use crate::repos::completions::{self, day_bounds, Completion};
use crate::repos::{modules, users};

const ACTIVE_WINDOW: Duration = Duration::days(7);

#[derive(Debug, Serialize, PartialEq)]
pub struct DashboardStats {
    pub total_miners: u64,
    pub active_miners: u64,
    pub total_modules: u64,
    pub monthly_completions: u64,
    pub average_score: f64,
    pub today_completions: u64,
}

/// Completion-derived figures for one supervisor's miners.
#[derive(Debug, PartialEq)]
pub struct CompletionSummary {
    pub active_miners: u64,
    pub monthly_completions: u64,
    pub average_score: f64,
    pub today_completions: u64,
}

/// `star_video_id` is today's active star, if one is set.
pub fn summarize(
    all: &[Completion],
    star_video_id: Option<i64>,
    now: OffsetDateTime,
) -> CompletionSummary {
    let active_since = now - ACTIVE_WINDOW;
    let month_start = day_bounds(now.date().replace_day(1).unwrap_or(now.date())).0;
    let (today_start, today_end) = day_bounds(now.date());

    let active: HashSet<&str> = all
        .iter()
        .filter(|c| c.completed_at >= active_since)
        .map(|c| c.miner_id.as_str())
        .collect();

    let monthly = all.iter().filter(|c| c.completed_at >= month_start).count();

    let scored: Vec<f64> = all
        .iter()
        .filter(|c| c.total_questions > 0)
        .map(|c| f64::from(c.score) / f64::from(c.total_questions) * 100.0)
        .collect();
    let average_score = if scored.is_empty() {
        0.0
    } else {
        scored.iter().sum::<f64>() / scored.len() as f64
    };

    let today_star: HashSet<&str> = match star_video_id {
        Some(video_id) => all
            .iter()
            .filter(|c| c.video_id == video_id)
            .filter(|c| c.completed_at >= today_start && c.completed_at < today_end)
            .map(|c| c.miner_id.as_str())
            .collect(),
        None => HashSet::new(),
    };

    CompletionSummary {
        active_miners: active.len() as u64,
        monthly_completions: monthly as u64,
        average_score,
        today_completions: today_star.len() as u64,
    }
}

pub async fn stats<C: ConnectionTrait>(
    conn: &C,
    supervisor_id: &str,
    now: OffsetDateTime,
) -> Result<DashboardStats, AppError> {
    let miners = users::list_miners(conn, supervisor_id).await?;
    let total_miners = miners.len() as u64;
    let ids = miners.into_iter().map(|m| m.user_id).collect();

    let all = completions::for_miners(conn, ids).await?;
    let star = modules::active_star_for_day(conn, supervisor_id, now.date()).await?;
    let summary = summarize(&all, star.map(|s| s.video_id), now);

    Ok(DashboardStats {
        total_miners,
        active_miners: summary.active_miners,
        total_modules: modules::count_active(conn).await?,
        monthly_completions: summary.monthly_completions,
        average_score: summary.average_score,
        today_completions: summary.today_completions,
    })
}
