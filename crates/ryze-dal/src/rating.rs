use futures::{StreamExt as _, TryStreamExt as _};
use garde::Validate;
use ryze_types::Stars;
use serde::{Deserialize, Serialize};

const VALID_ORDER_FIELDS: &[&str] = &["id", "stars", "created", "modified"];

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateRating {
    #[garde(dive)]
    pub stars: Stars,
    #[garde(length(min = 1, max = 1000))]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Rating {
    pub id: i64,
    pub subject_id: i64,
    pub rater_id: i64,
    pub stars: i64,
    pub comment: Option<String>,
    pub created: time::PrimitiveDateTime,
    pub modified: time::PrimitiveDateTime,
}

/// Aggregate over one subject's ratings, the input of the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingStats {
    pub average_rating: f64,
    pub total_ratings: u64,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StatsRow {
    pub(crate) average: Option<f64>,
    pub(crate) total: i64,
}

impl From<StatsRow> for RatingStats {
    fn from(row: StatsRow) -> Self {
        RatingStats {
            average_rating: row.average.unwrap_or(0.0),
            total_ratings: row.total.max(0) as u64,
        }
    }
}

/// Stamps out a rating repository for one rated table. The three rating
/// tables share their shape, only table and subject column names differ.
#[macro_export]
macro_rules! rating_repository {
    ($repo:ident, $repo_impl:ident, $table:literal, $subject_col:literal, $subject_table:literal, $subject_label:literal) => {
        pub type $repo = $repo_impl<sqlx::Pool<$crate::ChosenDB>>;

        pub struct $repo_impl<E> {
            executor: E,
        }

        impl<'c, E> $repo_impl<E>
        where
            for<'a> &'a E: sqlx::Executor<'c, Database = $crate::ChosenDB>,
        {
            pub fn new(executor: E) -> Self {
                Self { executor }
            }

            /// Upsert on the (subject, rater) pair - re-rating replaces the
            /// stars and comment instead of adding a second record.
            pub async fn rate(
                &self,
                subject_id: i64,
                rater_id: i64,
                payload: $crate::rating::CreateRating,
            ) -> $crate::error::Result<$crate::rating::Rating> {
                self.check_subject(subject_id).await?;

                sqlx::query(concat!(
                    "INSERT INTO ",
                    $table,
                    " (",
                    $subject_col,
                    ", rater_id, stars, comment, created, modified) VALUES (?, ?, ?, ?, datetime(), datetime()) ON CONFLICT(",
                    $subject_col,
                    ", rater_id) DO UPDATE SET stars = excluded.stars, comment = excluded.comment, modified = datetime()"
                ))
                .bind(subject_id)
                .bind(rater_id)
                .bind(payload.stars.value())
                .bind(&payload.comment)
                .execute(&self.executor)
                .await?;

                tracing::debug!(
                    "Stored {} stars for {} {subject_id} from rater {rater_id}",
                    payload.stars,
                    $subject_label
                );

                self.for_rater(subject_id, rater_id)
                    .await?
                    .ok_or_else(|| $crate::Error::RecordNotFound("Rating".to_string()))
            }

            pub async fn for_rater(
                &self,
                subject_id: i64,
                rater_id: i64,
            ) -> $crate::error::Result<Option<$crate::rating::Rating>> {
                let record = sqlx::query_as::<_, $crate::rating::Rating>(concat!(
                    "SELECT id, ",
                    $subject_col,
                    " AS subject_id, rater_id, stars, comment, created, modified FROM ",
                    $table,
                    " WHERE ",
                    $subject_col,
                    " = ? AND rater_id = ?"
                ))
                .bind(subject_id)
                .bind(rater_id)
                .fetch_optional(&self.executor)
                .await?;
                Ok(record)
            }

            pub async fn list(
                &self,
                subject_id: i64,
                params: $crate::ListingParams,
            ) -> $crate::error::Result<Vec<$crate::rating::Rating>> {
                let order_clause = params.order_clause(VALID_ORDER_FIELDS)?;
                let records = sqlx::query_as::<_, $crate::rating::Rating>(&format!(
                    "SELECT id, {col} AS subject_id, rater_id, stars, comment, created, modified FROM {table} WHERE {col} = ? {order_clause} LIMIT ? OFFSET ?",
                    col = $subject_col,
                    table = $table,
                ))
                .bind(subject_id)
                .bind(params.limit)
                .bind(params.offset)
                .fetch(&self.executor)
                .take($crate::MAX_LIMIT)
                .try_collect::<Vec<_>>()
                .await?;
                Ok(records)
            }

            /// Removes one rater's rating. The caller is responsible for
            /// refreshing the subject's stored score afterwards.
            pub async fn delete(
                &self,
                subject_id: i64,
                rater_id: i64,
            ) -> $crate::error::Result<()> {
                let res = sqlx::query(concat!(
                    "DELETE FROM ",
                    $table,
                    " WHERE ",
                    $subject_col,
                    " = ? AND rater_id = ?"
                ))
                .bind(subject_id)
                .bind(rater_id)
                .execute(&self.executor)
                .await?;

                if res.rows_affected() == 0 {
                    Err($crate::Error::RecordNotFound("Rating".to_string()))
                } else {
                    Ok(())
                }
            }

            pub async fn stats(
                &self,
                subject_id: i64,
            ) -> $crate::error::Result<$crate::rating::RatingStats> {
                let row = sqlx::query_as::<_, $crate::rating::StatsRow>(concat!(
                    "SELECT AVG(stars) AS average, COUNT(id) AS total FROM ",
                    $table,
                    " WHERE ",
                    $subject_col,
                    " = ?"
                ))
                .bind(subject_id)
                .fetch_one(&self.executor)
                .await?;
                Ok(row.into())
            }

            /// Star histogram, counts for 1 to 5 stars with absent buckets
            /// zero filled.
            pub async fn distribution(&self, subject_id: i64) -> $crate::error::Result<[u64; 5]> {
                let rows: Vec<(i64, i64)> = sqlx::query_as(concat!(
                    "SELECT stars, COUNT(id) FROM ",
                    $table,
                    " WHERE ",
                    $subject_col,
                    " = ? GROUP BY stars"
                ))
                .bind(subject_id)
                .fetch_all(&self.executor)
                .await?;

                let mut counts = [0u64; 5];
                for (stars, count) in rows {
                    if (1..=5).contains(&stars) {
                        counts[(stars - 1) as usize] = count.max(0) as u64;
                    }
                }
                Ok(counts)
            }

            async fn check_subject(&self, subject_id: i64) -> $crate::error::Result<()> {
                match sqlx::query_scalar::<_, i64>(concat!(
                    "SELECT id FROM ",
                    $subject_table,
                    " WHERE id = ?"
                ))
                .bind(subject_id)
                .fetch_optional(&self.executor)
                .await?
                {
                    Some(_id) => Ok(()),
                    None => Err($crate::Error::RecordNotFound($subject_label.to_string())),
                }
            }
        }
    };
}

rating_repository!(
    DeveloperRatingRepository,
    DeveloperRatingRepositoryImpl,
    "developer_rating",
    "developer_id",
    "developer_profile",
    "Developer profile"
);

rating_repository!(
    ShowcaseRatingRepository,
    ShowcaseRatingRepositoryImpl,
    "showcase_rating",
    "showcase_id",
    "showcase",
    "Showcase"
);

rating_repository!(
    VideoRatingRepository,
    VideoRatingRepositoryImpl,
    "video_rating",
    "video_id",
    "video",
    "Video"
);
