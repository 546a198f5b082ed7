use ryze_scoring::{ScoringParams, Strategy};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::rating::{RatingStats, StatsRow};
use crate::{Error, Pool};

/// Result of one score refresh, mirrored into the subject's stored fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreUpdate {
    pub average_rating: f64,
    pub total_ratings: u64,
    pub ryze_score: f64,
    pub success_rate: f64,
}

/// Recomputes stored reputation from the ratings tables.
///
/// Each refresh reads the rating aggregate and writes the derived fields back
/// on one transaction; the write-back is a single UPDATE, so a failed refresh
/// leaves the stored score untouched. The aggregate is recomputed from the
/// ratings table on every call, which makes refreshes converge even when
/// concurrent raters interleave.
pub struct ScoreService {
    pool: Pool,
    strategy: Strategy,
    params: ScoringParams,
}

impl ScoreService {
    pub fn new(pool: Pool, strategy: Strategy, params: ScoringParams) -> Self {
        Self {
            pool,
            strategy,
            params,
        }
    }

    pub fn with_defaults(pool: Pool) -> Self {
        Self::new(pool, Strategy::default(), ScoringParams::default())
    }

    fn compute(&self, stats: RatingStats) -> ScoreUpdate {
        let ryze_score =
            self.strategy
                .score(stats.average_rating, stats.total_ratings, &self.params);
        let success_rate =
            self.strategy
                .success_rate(stats.average_rating, stats.total_ratings, &self.params);
        ScoreUpdate {
            average_rating: stats.average_rating,
            total_ratings: stats.total_ratings,
            ryze_score,
            success_rate,
        }
    }

    pub async fn update_developer_ryze_score(&self, developer_id: i64) -> Result<ScoreUpdate> {
        let mut tx = self.pool.begin().await?;
        let stats = fetch_stats(
            &mut *tx,
            "SELECT AVG(stars) AS average, COUNT(id) AS total FROM developer_rating \
             WHERE developer_id = ?",
            developer_id,
        )
        .await?;
        let update = self.compute(stats);

        let result = sqlx::query(
            "UPDATE developer_profile SET rating = ?, success_rate = ?, \
             version = version + 1, modified = datetime() WHERE id = ?",
        )
        .bind(update.ryze_score)
        .bind(update.success_rate)
        .bind(developer_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RecordNotFound("Developer profile".to_string()));
        }
        tx.commit().await?;

        info!(
            "Updated developer {developer_id} RYZE score to {:.2} ({} ratings)",
            update.ryze_score, update.total_ratings
        );
        Ok(update)
    }

    pub async fn update_showcase_ryze_score(&self, showcase_id: i64) -> Result<ScoreUpdate> {
        let mut tx = self.pool.begin().await?;
        let stats = fetch_stats(
            &mut *tx,
            "SELECT AVG(stars) AS average, COUNT(id) AS total FROM showcase_rating \
             WHERE showcase_id = ?",
            showcase_id,
        )
        .await?;
        let update = self.compute(stats);

        let result = sqlx::query(
            "UPDATE showcase SET average_rating = ?, total_ratings = ?, \
             version = version + 1, modified = datetime() WHERE id = ?",
        )
        .bind(update.ryze_score)
        .bind(update.total_ratings as i64)
        .bind(showcase_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RecordNotFound("Showcase".to_string()));
        }
        tx.commit().await?;

        info!(
            "Updated showcase {showcase_id} RYZE score to {:.2} ({} ratings)",
            update.ryze_score, update.total_ratings
        );
        Ok(update)
    }

    pub async fn update_video_ryze_score(&self, video_id: i64) -> Result<ScoreUpdate> {
        let mut tx = self.pool.begin().await?;
        let stats = fetch_stats(
            &mut *tx,
            "SELECT AVG(stars) AS average, COUNT(id) AS total FROM video_rating \
             WHERE video_id = ?",
            video_id,
        )
        .await?;
        let update = self.compute(stats);

        let result = sqlx::query(
            "UPDATE video SET average_rating = ?, total_ratings = ?, \
             version = version + 1, modified = datetime() WHERE id = ?",
        )
        .bind(update.ryze_score)
        .bind(update.total_ratings as i64)
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RecordNotFound("Video".to_string()));
        }
        tx.commit().await?;

        info!(
            "Updated video {video_id} RYZE score to {:.2} ({} ratings)",
            update.ryze_score, update.total_ratings
        );
        Ok(update)
    }
}

async fn fetch_stats<'c, E>(executor: E, sql: &str, subject_id: i64) -> Result<RatingStats>
where
    E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    let row = sqlx::query_as::<_, StatsRow>(sql)
        .bind(subject_id)
        .fetch_one(executor)
        .await?;
    Ok(row.into())
}
