//! # Remote queries
//!
//! All reads against the catalog source. Transport and decode failures are
//! swallowed at this boundary: the public methods log a warning and return
//! the empty value for the call site, so callers cannot tell a failed query
//! from a query with no matches. There is no retry and no caching.

use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::models::{CategoriesResponse, Category, Product, ProductResponse, SearchResponse};

pub const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";

const USER_AGENT: &str = "food-explorer (rust terminal client)";

/// Field list requested on every listing query, keeping responses small.
const LISTING_FIELDS: &str = "code,product_name,image_url,image_front_url,image_small_url,\
                              categories_tags,nutrition_grades,nutrition_grade_fr,ingredients_text";

/// Server-side popularity metric the default feed is ordered by.
const FEED_SORT: &str = "unique_scans_n";

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl Client {
    pub fn new(base_url: impl Into<String>, page_size: u32) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size,
        }
    }

    /// One page of the popularity-ordered default feed. An empty page
    /// signals end-of-feed.
    pub async fn feed_page(&self, page: u32) -> Vec<Product> {
        match self.try_feed_page(page).await {
            Ok(products) => products,
            Err(err) => {
                warn!("feed page {page} query failed: {err}");
                Vec::new()
            }
        }
    }

    /// Free-text search, one bounded result set ranked by the source.
    pub async fn search(&self, terms: &str) -> Vec<Product> {
        match self.try_search(terms).await {
            Ok(products) => products,
            Err(err) => {
                warn!("search query for {terms:?} failed: {err}");
                Vec::new()
            }
        }
    }

    /// Members of one category, one bounded result set.
    pub async fn by_category(&self, tag: &str) -> Vec<Product> {
        match self.try_by_category(tag).await {
            Ok(products) => products,
            Err(err) => {
                warn!("category query for {tag:?} failed: {err}");
                Vec::new()
            }
        }
    }

    /// Exact-identifier lookup. Failure is indistinguishable from absence.
    pub async fn by_barcode(&self, barcode: &str) -> Option<Product> {
        match self.try_by_barcode(barcode).await {
            Ok(product) => product,
            Err(err) => {
                warn!("barcode lookup for {barcode:?} failed: {err}");
                None
            }
        }
    }

    /// All known categories as (tag, display name) pairs.
    pub async fn categories(&self) -> Vec<Category> {
        match self.try_categories().await {
            Ok(categories) => categories,
            Err(err) => {
                warn!("category list query failed: {err}");
                Vec::new()
            }
        }
    }

    async fn try_feed_page(&self, page: u32) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .http
            .get(format!("{}/cgi/search.pl", self.base_url))
            .query(&[("action", "process"), ("json", "true")])
            .query(&[("page", page), ("page_size", self.page_size)])
            .query(&[("sort_by", FEED_SORT), ("fields", LISTING_FIELDS)])
            .send()
            .await?;
        let decoded: SearchResponse = decode(response).await?;
        debug!("feed page {page} returned {} products", decoded.products.len());
        Ok(decoded.products.into_iter().map(Product::from).collect())
    }

    async fn try_search(&self, terms: &str) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .http
            .get(format!("{}/cgi/search.pl", self.base_url))
            .query(&[("search_terms", terms), ("json", "true")])
            .query(&[("page_size", self.page_size)])
            .query(&[("fields", LISTING_FIELDS)])
            .send()
            .await?;
        let decoded: SearchResponse = decode(response).await?;
        Ok(decoded.products.into_iter().map(Product::from).collect())
    }

    async fn try_by_category(&self, tag: &str) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .http
            .get(format!("{}/category/{tag}.json", self.base_url))
            .query(&[("page_size", self.page_size)])
            .query(&[("fields", LISTING_FIELDS)])
            .send()
            .await?;
        let decoded: SearchResponse = decode(response).await?;
        Ok(decoded.products.into_iter().map(Product::from).collect())
    }

    async fn try_by_barcode(&self, barcode: &str) -> Result<Option<Product>, CatalogError> {
        let response = self
            .http
            .get(format!("{}/api/v0/product/{barcode}.json", self.base_url))
            .send()
            .await?;
        let decoded: ProductResponse = decode(response).await?;
        Ok(decoded.product.map(Product::from))
    }

    async fn try_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let response = self
            .http
            .get(format!("{}/categories.json", self.base_url))
            .send()
            .await?;
        let decoded: CategoriesResponse = decode(response).await?;
        Ok(decoded.tags)
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CatalogError> {
    if !response.status().is_success() {
        return Err(CatalogError::Status(response.status()));
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
