//! # Browser
//!
//! Owner of the current product listing: the working set, the browse mode,
//! the pagination cursor, and a client-side sort applied to whatever is
//! loaded.
//!
//! Modes are mutually exclusive. The default feed accumulates pages; search
//! and category filtering each fetch one bounded set and disable pagination.
//! Every mode transition resets the set and cursor immediately and bumps an
//! epoch counter, so a query still in flight for an abandoned mode has its
//! result dropped instead of overwriting current state.

use clap::ValueEnum;
use tracing::debug;

use catalog::{utils::normalize_query, Product};

/// The one seam to the remote catalog the browser depends on. Production
/// uses [`catalog::Client`]; tests drive the machine with a stub.
pub trait ProductSource {
    fn feed_page(&self, page: u32) -> impl std::future::Future<Output = Vec<Product>>;
    fn search(&self, terms: &str) -> impl std::future::Future<Output = Vec<Product>>;
    fn by_category(&self, tag: &str) -> impl std::future::Future<Output = Vec<Product>>;
}

impl ProductSource for catalog::Client {
    async fn feed_page(&self, page: u32) -> Vec<Product> {
        catalog::Client::feed_page(self, page).await
    }

    async fn search(&self, terms: &str) -> Vec<Product> {
        catalog::Client::search(self, terms).await
    }

    async fn by_category(&self, tag: &str) -> Vec<Product> {
        catalog::Client::by_category(self, tag).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    DefaultFeed,
    TextSearch(String),
    CategoryFilter(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
    GradeAsc,
    GradeDesc,
}

pub struct Browser<S> {
    source: S,
    products: Vec<Product>,
    mode: Mode,
    page: u32,
    has_more: bool,
    sort: SortOrder,
    epoch: u64,
}

impl<S: ProductSource> Browser<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            products: Vec::new(),
            mode: Mode::DefaultFeed,
            page: 1,
            has_more: false,
            sort: SortOrder::default(),
            epoch: 0,
        }
    }

    /// Enters the default feed: resets the set and cursor, loads page one.
    pub async fn load_initial(&mut self) {
        let epoch = self.enter(Mode::DefaultFeed);
        let batch = self.source.feed_page(1).await;
        self.apply_feed_page(epoch, 1, batch);
    }

    /// Fetches the next feed page and appends it. Only the default feed
    /// paginates; in any other state, or past the end of the feed, this does
    /// nothing.
    pub async fn load_more(&mut self) {
        if self.mode != Mode::DefaultFeed || !self.has_more {
            return;
        }
        let epoch = self.epoch;
        let next = self.page + 1;
        let batch = self.source.feed_page(next).await;
        self.apply_feed_page(epoch, next, batch);
    }

    /// Free-text search. A blank term re-enters the default feed; anything
    /// else replaces the set with one bounded result and stops pagination.
    /// An empty result is a valid "no matches" state, not an error.
    pub async fn search(&mut self, term: &str) {
        let term = normalize_query(term);
        if term.is_empty() {
            self.load_initial().await;
            return;
        }
        let epoch = self.enter(Mode::TextSearch(term.clone()));
        let batch = self.source.search(&term).await;
        self.apply_replacement(epoch, batch);
    }

    /// Category filter. An empty tag re-enters the default feed; a tag
    /// replaces the set with that category's members and stops pagination.
    pub async fn filter_category(&mut self, tag: &str) {
        let tag = tag.trim().to_string();
        if tag.is_empty() {
            self.load_initial().await;
            return;
        }
        let epoch = self.enter(Mode::CategoryFilter(tag.clone()));
        let batch = self.source.by_category(&tag).await;
        self.apply_replacement(epoch, batch);
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    /// The current set under the current sort order. Pure re-ordering of
    /// whatever is loaded; never queries.
    pub fn sorted(&self) -> Vec<Product> {
        sort_products(&self.products, self.sort)
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Begins a mode transition. State resets take effect immediately; the
    /// bumped epoch invalidates whatever was in flight before.
    fn enter(&mut self, mode: Mode) -> u64 {
        self.mode = mode;
        self.products.clear();
        self.page = 1;
        self.has_more = false;
        self.epoch += 1;
        self.epoch
    }

    /// Feed-page reconciliation. `has_more` is derived from the page that
    /// actually arrived, never asserted ahead of evidence: a non-empty page
    /// appends and advances the cursor, an empty page terminates the feed
    /// and leaves the accumulated set and cursor untouched.
    fn apply_feed_page(&mut self, epoch: u64, page: u32, batch: Vec<Product>) {
        if epoch != self.epoch {
            debug!("dropping stale feed page {page} from epoch {epoch}");
            return;
        }
        if batch.is_empty() {
            self.has_more = false;
            return;
        }
        self.products.extend(batch);
        self.page = page;
        self.has_more = true;
    }

    fn apply_replacement(&mut self, epoch: u64, batch: Vec<Product>) {
        if epoch != self.epoch {
            debug!("dropping stale result from epoch {epoch}");
            return;
        }
        self.products = batch;
        self.has_more = false;
    }
}

/// Stable client-side sort. Missing names compare as the empty string
/// (first ascending); missing grades compare as "z" (worst, last
/// ascending).
pub fn sort_products(products: &[Product], order: SortOrder) -> Vec<Product> {
    let mut sorted = products.to_vec();
    match order {
        SortOrder::NameAsc => sorted.sort_by(|a, b| name_key(a).cmp(&name_key(b))),
        SortOrder::NameDesc => sorted.sort_by(|a, b| name_key(b).cmp(&name_key(a))),
        SortOrder::GradeAsc => sorted.sort_by(|a, b| grade_key(a).cmp(grade_key(b))),
        SortOrder::GradeDesc => sorted.sort_by(|a, b| grade_key(b).cmp(grade_key(a))),
    }
    sorted
}

fn name_key(product: &Product) -> String {
    product.name.as_deref().unwrap_or("").to_lowercase()
}

fn grade_key(product: &Product) -> &str {
    product.grade.as_deref().unwrap_or("z")
}
