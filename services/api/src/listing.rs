//! Ad listing queries
//!
//! Turns raw `GET /ads` parameters into a normalized [`ListingQuery`] and then
//! into a parameterized SQL [`QueryPlan`] over the fixed ad + author join.
//!
//! Only bound values travel as placeholders. Column names and sort direction
//! cannot be bound, so they come from the closed [`SortField`] and
//! [`SortOrder`] enums and never from caller text.

use rust_decimal::Decimal;
use std::{fmt::Write, str::FromStr};
use thiserror::Error;

use crate::models::ad::ListAdsParams;

/// Page used when the caller sends none or a non-positive one
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller sends none or a non-positive one
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Largest page size served
pub const MAX_PER_PAGE: u32 = 100;

/// Columns of the ad + author join, shared by listing and single-ad lookups
pub const AD_WITH_AUTHOR_SELECT: &str = "SELECT a.id, a.user_guid, u.username AS author_login, \
     a.title, a.description, a.image_url, a.price, a.created_at \
     FROM ads a JOIN users u ON a.user_guid = u.guid";

/// Rejected listing parameters
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ListingError {
    #[error("invalid {field}: {value:?} is not a number")]
    InvalidPrice { field: &'static str, value: String },
}

/// Sortable ad columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Price,
    #[default]
    CreatedAt,
}

impl SortField {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("price") => SortField::Price,
            _ => SortField::CreatedAt,
        }
    }

    fn column(self) -> &'static str {
        match self {
            SortField::Price => "a.price",
            SortField::CreatedAt => "a.created_at",
        }
    }

    /// Newest first for recency, cheapest first for price
    fn default_order(self) -> SortOrder {
        match self {
            SortField::Price => SortOrder::Asc,
            SortField::CreatedAt => SortOrder::Desc,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("asc") => Some(SortOrder::Asc),
            Some("desc") => Some(SortOrder::Desc),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Normalized listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub page: u32,
    pub per_page: u32,
    pub sort_by: SortField,
    pub order: SortOrder,
    /// Inclusive lower price bound
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound
    pub max_price: Option<Decimal>,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            sort_by: SortField::default(),
            order: SortField::default().default_order(),
            min_price: None,
            max_price: None,
        }
    }
}

impl ListingQuery {
    /// Normalize raw query parameters.
    ///
    /// Bad paging and sorting input falls back to defaults; a price bound
    /// that is present but not a number is an error.
    pub fn from_params(params: &ListAdsParams) -> Result<Self, ListingError> {
        let sort_by = SortField::parse(params.sort_by.as_deref());
        let order =
            SortOrder::parse(params.order.as_deref()).unwrap_or_else(|| sort_by.default_order());

        Ok(Self {
            page: parse_positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            per_page: parse_positive(params.per_page.as_deref())
                .unwrap_or(DEFAULT_PER_PAGE)
                .min(MAX_PER_PAGE),
            sort_by,
            order,
            min_price: parse_price("min_price", params.min_price.as_deref())?,
            max_price: parse_price("max_price", params.max_price.as_deref())?,
        })
    }

    /// Rows to return
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// Rows to skip: `(page - 1) * per_page`
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }

    /// Whether a price falls inside both bounds
    pub fn admits(&self, price: Decimal) -> bool {
        self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value > 0)
        .map(|value| u32::try_from(value).unwrap_or(u32::MAX))
}

fn parse_price(field: &'static str, raw: Option<&str>) -> Result<Option<Decimal>, ListingError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    Decimal::from_str(value)
        .map(Some)
        .map_err(|_| ListingError::InvalidPrice {
            field,
            value: value.to_string(),
        })
}

/// Value bound to a numbered placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Price(Decimal),
    Integer(i64),
}

/// SQL text plus the values for its `$1..$n` placeholders, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

impl QueryPlan {
    /// Plan the listing query for a normalized request
    pub fn for_listing(query: &ListingQuery) -> Self {
        ListingFilterBuilder::new()
            .min_price(query.min_price)
            .max_price(query.max_price)
            .order_by(query.sort_by, query.order)
            .paginate(query.limit(), query.offset())
            .build()
    }
}

/// Incremental builder for the listing query.
///
/// Each clause that needs a value takes the next placeholder index, so the
/// SQL text and the parameter list can never drift apart.
#[derive(Debug)]
pub struct ListingFilterBuilder {
    sql: String,
    params: Vec<QueryParam>,
    has_predicate: bool,
}

impl Default for ListingFilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingFilterBuilder {
    pub fn new() -> Self {
        Self {
            sql: AD_WITH_AUTHOR_SELECT.to_string(),
            params: Vec::new(),
            has_predicate: false,
        }
    }

    /// Bind a value and return its placeholder
    fn bind(&mut self, param: QueryParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    fn predicate(&mut self, condition: &str, param: QueryParam) {
        let keyword = if self.has_predicate { "AND" } else { "WHERE" };
        let placeholder = self.bind(param);
        let _ = write!(self.sql, " {keyword} {condition} {placeholder}");
        self.has_predicate = true;
    }

    pub fn min_price(mut self, min_price: Option<Decimal>) -> Self {
        if let Some(min) = min_price {
            self.predicate("a.price >=", QueryParam::Price(min));
        }
        self
    }

    pub fn max_price(mut self, max_price: Option<Decimal>) -> Self {
        if let Some(max) = max_price {
            self.predicate("a.price <=", QueryParam::Price(max));
        }
        self
    }

    /// Order by the chosen column, then by id in the same direction
    pub fn order_by(mut self, field: SortField, order: SortOrder) -> Self {
        let direction = order.keyword();
        let _ = write!(
            self.sql,
            " ORDER BY {} {direction}, a.id {direction}",
            field.column()
        );
        self
    }

    pub fn paginate(mut self, limit: i64, offset: i64) -> Self {
        let limit = self.bind(QueryParam::Integer(limit));
        let offset = self.bind(QueryParam::Integer(offset));
        let _ = write!(self.sql, " LIMIT {limit} OFFSET {offset}");
        self
    }

    pub fn build(self) -> QueryPlan {
        QueryPlan {
            sql: self.sql,
            params: self.params,
        }
    }
}
