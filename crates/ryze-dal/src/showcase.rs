use futures::{StreamExt as _, TryStreamExt as _};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Pool;

use crate::{error::Result, Error, ListingParams};

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateShowcase {
    #[garde(range(min = 1))]
    pub developer_id: i64,
    #[garde(length(min = 1, max = 511))]
    pub title: String,
    #[garde(length(min = 1, max = 5000))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Showcase {
    pub id: i64,
    pub developer_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub version: i64,
    pub created_by: Option<String>,
    pub created: time::PrimitiveDateTime,
    pub modified: time::PrimitiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct ShowcaseShort {
    pub id: i64,
    pub developer_id: i64,
    pub title: String,
    pub average_rating: f64,
    pub total_ratings: i64,
}

const VALID_ORDER_FIELDS: &[&str] = &[
    "id",
    "title",
    "average_rating",
    "total_ratings",
    "created",
    "modified",
];

pub type ShowcaseRepository = ShowcaseRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct ShowcaseRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> ShowcaseRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateShowcase) -> Result<Showcase> {
        self.check_developer(payload.developer_id).await?;
        let result = sqlx::query(
            "INSERT INTO showcase (developer_id, title, description, version, created, modified) \
             VALUES (?, ?, ?, 1, datetime(), datetime())",
        )
        .bind(payload.developer_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id).await
    }

    pub async fn list(&self, params: ListingParams) -> Result<Vec<ShowcaseShort>> {
        let order_clause = params.order_clause(VALID_ORDER_FIELDS)?;
        let records = sqlx::query_as::<_, ShowcaseShort>(&format!(
            "SELECT id, developer_id, title, average_rating, total_ratings FROM showcase \
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
        let res = sqlx::query("DELETE FROM showcase WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound("Showcase".to_string()))
        } else {
            Ok(())
        }
    }

    pub async fn get(&self, id: i64) -> Result<Showcase> {
        let record = sqlx::query_as::<_, Showcase>("SELECT * FROM showcase WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Showcase".to_string()))?;
        Ok(record)
    }

    async fn check_developer(&self, developer_id: i64) -> Result<()> {
        match sqlx::query_scalar::<_, i64>("SELECT id FROM developer_profile WHERE id = ?")
            .bind(developer_id)
            .fetch_optional(&self.executor)
            .await?
        {
            Some(_id) => Ok(()),
            None => Err(Error::RecordNotFound("Developer profile".to_string())),
        }
    }
}
