use serde::Serialize;
use sqlx::Pool;

use crate::{error::Result, Error};

const PROFILE_WEIGHT: f64 = 0.4;
const VIDEO_WEIGHT: f64 = 0.3;
const SHOWCASE_WEIGHT: f64 = 0.3;

/// Cross-entity view of one developer's reputation. The composite blends the
/// stored scores: 40% profile, 30% videos, 30% showcases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeveloperMetrics {
    pub profile_rating: f64,
    pub video_rating: f64,
    pub showcase_rating: f64,
    pub composite_score: f64,
    pub total_videos: u64,
    pub total_showcases: u64,
    pub success_rate: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct MetricsRow {
    profile_rating: f64,
    success_rate: f64,
    video_rating: Option<f64>,
    showcase_rating: Option<f64>,
    total_videos: i64,
    total_showcases: i64,
}

pub type MetricsRepository = MetricsRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct MetricsRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> MetricsRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn developer(&self, developer_id: i64) -> Result<DeveloperMetrics> {
        const SQL: &str = r#"
        SELECT d.rating AS profile_rating,
               d.success_rate AS success_rate,
               (SELECT AVG(v.average_rating) FROM video v WHERE v.developer_id = d.id) AS video_rating,
               (SELECT AVG(s.average_rating) FROM showcase s WHERE s.developer_id = d.id) AS showcase_rating,
               (SELECT COUNT(v.id) FROM video v WHERE v.developer_id = d.id) AS total_videos,
               (SELECT COUNT(s.id) FROM showcase s WHERE s.developer_id = d.id) AS total_showcases
        FROM developer_profile d
        WHERE d.id = ?;
        "#;
        let row = sqlx::query_as::<_, MetricsRow>(SQL)
            .bind(developer_id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Developer profile".to_string()))?;

        let video_rating = row.video_rating.unwrap_or(0.0);
        let showcase_rating = row.showcase_rating.unwrap_or(0.0);
        let composite_score = row.profile_rating * PROFILE_WEIGHT
            + video_rating * VIDEO_WEIGHT
            + showcase_rating * SHOWCASE_WEIGHT;

        Ok(DeveloperMetrics {
            profile_rating: row.profile_rating,
            video_rating,
            showcase_rating,
            composite_score,
            total_videos: row.total_videos.max(0) as u64,
            total_showcases: row.total_showcases.max(0) as u64,
            success_rate: row.success_rate,
        })
    }
}
