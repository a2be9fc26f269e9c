//! Ad repository for database operations

use async_trait::async_trait;
use common::error::{StoreError, StoreResult};
use sqlx::PgPool;
use tracing::{debug, info};

use crate::{
    listing::{AD_WITH_AUTHOR_SELECT, ListingQuery, QueryParam, QueryPlan},
    models::ad::{Ad, AdWithAuthor, NewAd},
};

/// Storage operations on ads
#[async_trait]
pub trait AdStore: Send + Sync {
    /// Persist a new ad and return it with its assigned id
    async fn insert(&self, new_ad: &NewAd) -> StoreResult<Ad>;

    /// Fetch one page of ads with their authors, in the requested order
    async fn list(&self, query: &ListingQuery) -> StoreResult<Vec<AdWithAuthor>>;

    /// Fetch a single ad with its author
    async fn get_by_id(&self, id: i64) -> StoreResult<AdWithAuthor>;
}

/// PostgreSQL-backed ad repository
#[derive(Clone)]
pub struct PgAdRepository {
    pool: PgPool,
}

impl PgAdRepository {
    /// Create a new ad repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdStore for PgAdRepository {
    async fn insert(&self, new_ad: &NewAd) -> StoreResult<Ad> {
        let ad = sqlx::query_as::<_, Ad>(
            r#"
            INSERT INTO ads (user_guid, title, description, image_url, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_guid, title, description, image_url, price, created_at
            "#,
        )
        .bind(new_ad.user_guid)
        .bind(&new_ad.title)
        .bind(&new_ad.description)
        .bind(&new_ad.image_url)
        .bind(new_ad.price)
        .fetch_one(&self.pool)
        .await?;

        info!(ad_id = ad.id, owner = %ad.user_guid, "Created ad");
        Ok(ad)
    }

    async fn list(&self, query: &ListingQuery) -> StoreResult<Vec<AdWithAuthor>> {
        let plan = QueryPlan::for_listing(query);
        debug!(sql = %plan.sql, params = plan.params.len(), "Listing ads");

        let mut statement = sqlx::query_as::<_, AdWithAuthor>(&plan.sql);
        for param in plan.params {
            statement = match param {
                QueryParam::Price(price) => statement.bind(price),
                QueryParam::Integer(value) => statement.bind(value),
            };
        }

        let ads = statement.fetch_all(&self.pool).await?;
        Ok(ads)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<AdWithAuthor> {
        let sql = format!("{AD_WITH_AUTHOR_SELECT} WHERE a.id = $1");

        let ad = sqlx::query_as::<_, AdWithAuthor>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        ad.ok_or(StoreError::NotFound)
    }
}
