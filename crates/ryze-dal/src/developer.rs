use futures::{StreamExt as _, TryStreamExt as _};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use tracing::debug;

use crate::{error::Result, Error, ListingParams};

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateDeveloper {
    #[garde(length(min = 1, max = 255))]
    pub display_name: String,
    #[garde(length(min = 1, max = 511))]
    pub headline: Option<String>,
    #[garde(range(min = 0))]
    pub version: Option<i64>,
}

/// Developer profile. `rating` holds the RYZE score on the 0-5 scale,
/// `success_rate` its 0-100 percentage; both are derived fields owned by the
/// score refresh, not by profile edits.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct DeveloperProfile {
    pub id: i64,
    pub display_name: String,
    pub headline: Option<String>,
    pub rating: f64,
    pub success_rate: f64,
    pub version: i64,
    pub created_by: Option<String>,
    pub created: time::PrimitiveDateTime,
    pub modified: time::PrimitiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct DeveloperShort {
    pub id: i64,
    pub display_name: String,
    pub rating: f64,
    pub success_rate: f64,
}

const VALID_ORDER_FIELDS: &[&str] = &[
    "id",
    "display_name",
    "rating",
    "success_rate",
    "created",
    "modified",
];

pub type DeveloperRepository = DeveloperRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct DeveloperRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> DeveloperRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateDeveloper) -> Result<DeveloperProfile> {
        let result = sqlx::query(
            "INSERT INTO developer_profile (display_name, headline, version, created, modified) \
             VALUES (?, ?, 1, datetime(), datetime())",
        )
        .bind(&payload.display_name)
        .bind(&payload.headline)
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id).await
    }

    pub async fn update(&self, id: i64, payload: CreateDeveloper) -> Result<DeveloperProfile> {
        let version = payload.version.ok_or_else(|| {
            debug!("No version provided");
            Error::MissingVersion
        })?;
        let result = sqlx::query(
            "UPDATE developer_profile SET display_name = ?, headline = ?, version = ?, \
             modified = datetime() WHERE id = ? and version = ?",
        )
        .bind(&payload.display_name)
        .bind(&payload.headline)
        .bind(version + 1)
        .bind(id)
        .bind(version)
        .execute(&self.executor)
        .await?;

        if result.rows_affected() == 0 {
            Err(Error::FailedUpdate { id, version })
        } else {
            self.get(id).await
        }
    }

    pub async fn list(&self, params: ListingParams) -> Result<Vec<DeveloperShort>> {
        let order_clause = params.order_clause(VALID_ORDER_FIELDS)?;
        let records = sqlx::query_as::<_, DeveloperShort>(&format!(
            "SELECT id, display_name, rating, success_rate FROM developer_profile \
             {order_clause} LIMIT ? OFFSET ?"
        ))
        .bind(params.limit)
        .bind(params.offset)
        .fetch(&self.executor)
        .take(crate::MAX_LIMIT)
        .try_collect::<Vec<_>>()
        .await?;
        Ok(records)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM developer_profile WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound("Developer profile".to_string()))
        } else {
            Ok(())
        }
    }

    pub async fn get(&self, id: i64) -> Result<DeveloperProfile> {
        let record = sqlx::query_as::<_, DeveloperProfile>(
            "SELECT * FROM developer_profile WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.executor)
        .await?
        .ok_or_else(|| Error::RecordNotFound("Developer profile".to_string()))?;
        Ok(record)
    }
}
