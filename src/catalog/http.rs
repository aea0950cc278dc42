//! HTTP catalog client (reqwest).
//!
//! Endpoints:
//! - `GET {base}/api/apps/?collection=..&category=..&num=..&lang=..&country=..`
//! - `GET {base}/api/apps/{id}/similar/?lang=..&country=..`
//! - `GET {base}/api/apps/{id}/?lang=..&country=..`

use anyhow::{Context, bail};
use log::{debug, warn};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;

use crate::error::FetchError;
use crate::{AppDetail, CatalogItem, ListQuery, Locale};

use super::Catalog;

/// Catalog backed by a REST service. Cloning shares the connection pool.
#[derive(Clone, Debug)]
pub struct HttpCatalog {
    client: Client,
    base: Url,
}

impl HttpCatalog {
    /// Build a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build HTTP client")?;
        let base =
            Url::parse(base_url).with_context(|| format!("invalid catalog url '{base_url}'"))?;
        if base.cannot_be_a_base() {
            bail!("catalog url '{base_url}' cannot take a path");
        }
        Ok(Self { client, base })
    }

    /// `{base}/api/apps/{segments..}/`. Each segment is percent-encoded, so ids never change
    /// the endpoint.
    fn apps_url(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::malformed(self.base.as_str(), "catalog url cannot take a path")
            })?
            .pop_if_empty()
            .extend(["api", "apps"])
            .extend(segments)
            .push("");
        Ok(url)
    }

    async fn get_json(&self, url: &Url, query: &[(&str, String)]) -> Result<Value, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::malformed(url.as_str(), e.to_string()))
    }
}

fn locale_params(locale: &Locale) -> [(&'static str, String); 2] {
    [
        ("lang", locale.language.clone()),
        ("country", locale.region.clone()),
    ]
}

impl Catalog for HttpCatalog {
    async fn list(&self, query: &ListQuery) -> Result<Vec<CatalogItem>, FetchError> {
        let url = self.apps_url(&[])?;
        let [lang, country] = locale_params(&query.locale);
        let params = [
            ("collection", query.collection.clone()),
            ("category", query.category.clone()),
            ("num", query.page_size.to_string()),
            lang,
            country,
        ];
        let body = self.get_json(&url, &params).await?;
        parse_items(url.as_str(), body)
    }

    async fn similar(&self, id: &str, locale: &Locale) -> Result<Vec<CatalogItem>, FetchError> {
        let url = self.apps_url(&[id, "similar"])?;
        let body = self.get_json(&url, &locale_params(locale)).await?;
        parse_items(url.as_str(), body)
    }

    async fn detail(&self, id: &str, locale: &Locale) -> Result<AppDetail, FetchError> {
        let url = self.apps_url(&[id])?;
        let body = self.get_json(&url, &locale_params(locale)).await?;
        parse_detail(url.as_str(), body)
    }
}

/// Turn a listing payload into items. Accepts a bare array or `{ "results": [...] }`.
/// Elements without a string `appId` (or `id`) are logged and skipped; only a payload of the
/// wrong shape is an error.
pub fn parse_items(url: &str, body: Value) -> Result<Vec<CatalogItem>, FetchError> {
    let elements = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => return Err(FetchError::malformed(url, "expected a `results` array")),
        },
        _ => return Err(FetchError::malformed(url, "expected an array of items")),
    };

    Ok(elements
        .into_iter()
        .filter_map(|raw| {
            let id = raw
                .get("appId")
                .or_else(|| raw.get("id"))
                .and_then(Value::as_str)
                .map(str::to_string);
            match id {
                Some(id) => Some(CatalogItem { id, raw }),
                None => {
                    warn!("Skipping item without appId from {}: {}", url, raw);
                    None
                }
            }
        })
        .collect())
}

/// Extract the detail fields. Missing install bounds read as 0 and a missing range as empty;
/// `free` is required.
pub fn parse_detail(url: &str, body: Value) -> Result<AppDetail, FetchError> {
    if !body.is_object() {
        return Err(FetchError::malformed(url, "expected a detail object"));
    }
    let is_free = body
        .get("free")
        .and_then(Value::as_bool)
        .ok_or_else(|| FetchError::malformed(url, "missing `free` flag"))?;
    let install_range = body
        .get("installs")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let min_installs = body.get("minInstalls").and_then(Value::as_i64).unwrap_or(0);
    let max_installs = body.get("maxInstalls").and_then(Value::as_i64).unwrap_or(0);
    Ok(AppDetail {
        install_range,
        min_installs,
        max_installs,
        is_free,
        raw: body,
    })
}
