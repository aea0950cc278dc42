//! Catalog service: ranked listings, related items and detail records.
//!
//! The pipeline only depends on the [`Catalog`] trait; [`HttpCatalog`] talks to a
//! google-play-api style REST service. Tests plug in an in-process implementation.

mod http;

pub use http::{HttpCatalog, parse_detail, parse_items};

use std::future::Future;

use crate::error::FetchError;
use crate::{AppDetail, CatalogItem, ListQuery, Locale};

/// The three catalog calls the crawl is built on. Every call may fail with a [`FetchError`].
pub trait Catalog {
    /// One ranked page for a (category, collection) pair.
    fn list(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<Vec<CatalogItem>, FetchError>>;

    /// Items the catalog lists as related to `id`.
    fn similar(
        &self,
        id: &str,
        locale: &Locale,
    ) -> impl Future<Output = Result<Vec<CatalogItem>, FetchError>>;

    /// Full metadata for `id`.
    fn detail(&self, id: &str, locale: &Locale)
    -> impl Future<Output = Result<AppDetail, FetchError>>;
}
