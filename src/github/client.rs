use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::{header, Client, Response, StatusCode, Url};
use serde::Deserialize;
use std::num::NonZeroUsize;

use crate::error::{Error, Result};
use crate::github::paginator::Paginator;
use crate::github::query::SearchQuery;
use crate::models::ResultItem;

pub const GITHUB_API: &str = "https://api.github.com";
const SEARCH_ISSUES_PATH: &str = "search/issues";
const PER_PAGE: &str = "100";

/// Something that can run an issue search to completion.
#[async_trait]
pub trait IssueSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ResultItem>>;
}

pub struct SearchClient {
    client: Client,
    base_url: String,
    max_pages: Option<NonZeroUsize>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl SearchClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API)
    }

    pub fn with_base_url(token: &str, base_url: impl Into<String>) -> Result<Self> {
        let mut auth = header::HeaderValue::from_str(&format!("token {}", token))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("ghcontrib/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_pages: None,
        })
    }

    /// Stop after `max_pages` pages. Unset by default: the server decides
    /// when the result set ends. At least the first page is always fetched.
    pub fn with_max_pages(mut self, max_pages: Option<NonZeroUsize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn search_url(&self, query: &SearchQuery) -> Result<Url> {
        let endpoint = format!("{}/{}", self.base_url, SEARCH_ISSUES_PATH);
        Url::parse_with_params(&endpoint, &[("q", query.as_str()), ("per_page", PER_PAGE)])
            .map_err(|e| Error::Config(format!("invalid search URL {}: {}", endpoint, e)))
    }

    /// Runs `query` and returns every matching item across all pages, in
    /// page order. Any failing page aborts the whole search.
    pub async fn execute(&self, query: &SearchQuery) -> Result<Vec<ResultItem>> {
        let url = self.search_url(query)?;
        tracing::info!("Searching issues: {}", query);

        let paginator = Paginator::new(&self.client, self.max_pages);
        let items: Vec<ResultItem> = paginator.pages(url.to_string()).try_concat().await?;

        tracing::debug!("Search returned {} items", items.len());
        Ok(items)
    }
}

#[async_trait]
impl IssueSearch for SearchClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ResultItem>> {
        self.execute(query).await
    }
}

/// Maps a response status onto the error taxonomy. Only 200 and 202 carry a
/// usable page.
pub(crate) async fn classify_response(response: Response) -> Result<Response> {
    let status = response.status();
    match status {
        StatusCode::OK | StatusCode::ACCEPTED => Ok(response),
        StatusCode::UNAUTHORIZED => Err(Error::Auth),
        s if s.is_server_error() => Err(Error::Upstream { status: s.as_u16() }),
        s => {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("GitHub returned {}: {}", s, body);
            Err(Error::Request {
                status: s.as_u16(),
                reason: error_reason(s, &body),
            })
        }
    }
}

fn error_reason(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Unknown").to_string())
}
