//! Ad models for the API service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Persisted ad, as returned after creation
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Ad {
    pub id: i64,
    pub user_guid: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Validated ad ready to be inserted
#[derive(Debug, Clone)]
pub struct NewAd {
    pub user_guid: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: Decimal,
}

/// Ad joined with its author's public handle
#[derive(Debug, Clone, FromRow)]
pub struct AdWithAuthor {
    pub id: i64,
    pub user_guid: Uuid,
    pub author_login: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Ad summary returned by the listing and single-ad endpoints.
///
/// `is_owner` is only present when the caller is authenticated.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub author_login: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_owner: Option<bool>,
}

impl AdSummary {
    pub fn new(ad: AdWithAuthor, is_owner: Option<bool>) -> Self {
        Self {
            id: ad.id,
            title: ad.title,
            description: ad.description,
            image_url: ad.image_url,
            price: ad.price,
            author_login: ad.author_login,
            created_at: ad.created_at,
            is_owner,
        }
    }
}

/// Request for ad creation
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAdRequest {
    /// 1-100 characters
    #[schema(example = "Bike")]
    pub title: String,
    /// 1-500 characters
    #[schema(example = "A red bike in good condition")]
    pub description: String,
    /// Absolute URL
    #[schema(example = "https://example.com/bike.png")]
    pub image_url: String,
    /// Non-negative, at most two decimal places
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(example = 150.0)]
    pub price: Decimal,
}

/// Raw query parameters for ad listing.
///
/// Everything arrives as text so normalization can decide which malformed
/// values fall back to defaults and which are rejected.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAdsParams {
    /// Page number, starting at 1
    pub page: Option<String>,
    /// Page size, capped at 100 (default: 10)
    pub per_page: Option<String>,
    /// `created_at` (default) or `price`
    pub sort_by: Option<String>,
    /// `asc` or `desc`; defaults to `desc` for `created_at`, `asc` for `price`
    pub order: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    pub max_price: Option<String>,
}
