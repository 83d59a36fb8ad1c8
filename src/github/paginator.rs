use futures::stream::{self, Stream};
use std::num::NonZeroUsize;
use reqwest::header::{self, HeaderMap};
use reqwest::Client;

use crate::error::Result;
use crate::github::client::classify_response;
use crate::models::{ResultItem, SearchPage};

/// Walks a search result set by following `rel="next"` links.
///
/// The link URL is used verbatim; it already carries the query and cursor.
/// Pagination ends when the server stops sending a next link, or at
/// `max_pages` when a cap is set.
#[derive(Clone, Copy)]
pub struct Paginator<'a> {
    client: &'a Client,
    max_pages: Option<NonZeroUsize>,
}

struct PageState {
    next: Option<String>,
    fetched: usize,
    seen_items: usize,
}

struct Page {
    items: Vec<ResultItem>,
    next: Option<String>,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a Client, max_pages: Option<NonZeroUsize>) -> Self {
        Self { client, max_pages }
    }

    /// Lazy stream of pages starting at `first_url`. Each poll that needs a
    /// new page performs one request; the stream cannot be restarted.
    pub fn pages(&self, first_url: String) -> impl Stream<Item = Result<Vec<ResultItem>>> + 'a {
        let paginator = *self;
        let state = PageState {
            next: Some(first_url),
            fetched: 0,
            seen_items: 0,
        };

        stream::try_unfold(state, move |state| paginator.next_page(state))
    }

    async fn next_page(self, mut state: PageState) -> Result<Option<(Vec<ResultItem>, PageState)>> {
        let Some(url) = state.next.take() else {
            return Ok(None);
        };

        if let Some(max) = self.max_pages {
            if state.fetched >= max.get() {
                tracing::warn!("Stopping after {} pages, more results are available", max);
                return Ok(None);
            }
        }

        let page = self.fetch_page(&url, state.seen_items).await?;
        state.fetched += 1;
        state.seen_items += page.items.len();
        state.next = page.next;

        Ok(Some((page.items, state)))
    }

    async fn fetch_page(&self, url: &str, offset: usize) -> Result<Page> {
        tracing::debug!("Fetching: {}", url);
        let response = self.client.get(url).send().await?;

        let next = next_link(response.headers());

        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
        {
            tracing::debug!("Rate limit remaining: {}", remaining);
        }

        let response = classify_response(response).await?;
        let body = response.bytes().await?;
        let page: SearchPage = serde_json::from_slice(&body)?;

        if offset == 0 {
            if let Some(total) = page.total_count {
                tracing::debug!("Search reports {} total results", total);
            }
        }
        if page.incomplete_results == Some(true) {
            tracing::warn!("Search results are incomplete, GitHub timed out part of the query");
        }

        Ok(Page {
            items: page.into_items(offset)?,
            next,
        })
    }
}

/// Finds the `rel="next"` target across every `Link` header on a response.
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::LINK)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(parse_next_link)
}

/// Extracts the `rel="next"` target from an RFC 8288 `Link` header value.
pub fn parse_next_link(header: &str) -> Option<String> {
    split_links(header).into_iter().find_map(|link| {
        let (target, params) = link.split_once(';')?;
        let url = target.trim().strip_prefix('<')?.strip_suffix('>')?;

        let is_next = params.split(';').any(|param| {
            param
                .trim()
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"').split_whitespace().any(|r| r == "next"))
                .unwrap_or(false)
        });

        is_next.then(|| url.to_string())
    })
}

/// Splits a header value into link-values on commas that sit outside
/// `<...>` targets and quoted parameter values.
fn split_links(header: &str) -> Vec<&str> {
    let mut links = Vec::new();
    let mut in_target = false;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in header.char_indices() {
        match c {
            '<' if !in_quotes => in_target = true,
            '>' if !in_quotes => in_target = false,
            '"' if !in_target => in_quotes = !in_quotes,
            ',' if !in_target && !in_quotes => {
                links.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    links.push(&header[start..]);
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_next_link() {
        let header = r#"<https://api.github.com/search/issues?q=a&page=2>; rel="next", <https://api.github.com/search/issues?q=a&page=5>; rel="last""#;
        assert_eq!(
            parse_next_link(header),
            Some("https://api.github.com/search/issues?q=a&page=2".to_string())
        );
    }

    #[test]
    fn test_parse_next_link_not_first() {
        let header = r#"<https://api.github.com/x?page=1>; rel="prev", <https://api.github.com/x?page=3>; rel="next""#;
        assert_eq!(
            parse_next_link(header),
            Some("https://api.github.com/x?page=3".to_string())
        );
    }

    #[test]
    fn test_parse_last_page_has_no_next() {
        let header = r#"<https://api.github.com/x?page=1>; rel="first", <https://api.github.com/x?page=4>; rel="prev""#;
        assert_eq!(parse_next_link(header), None);
        assert_eq!(parse_next_link(""), None);
    }

    #[test]
    fn test_comma_inside_quoted_param() {
        let header = r#"<https://api.github.com/x?page=1>; rel="prev"; title="older, first", <https://api.github.com/x?page=3>; rel="next""#;
        assert_eq!(
            parse_next_link(header),
            Some("https://api.github.com/x?page=3".to_string())
        );
    }

    #[test]
    fn test_next_link_in_second_header_line() {
        let mut headers = HeaderMap::new();
        headers.append(
            header::LINK,
            header::HeaderValue::from_static(r#"<https://api.github.com/x?page=1>; rel="prev""#),
        );
        headers.append(
            header::LINK,
            header::HeaderValue::from_static(r#"<https://api.github.com/x?page=3>; rel="next""#),
        );
        assert_eq!(
            next_link(&headers),
            Some("https://api.github.com/x?page=3".to_string())
        );
        assert_eq!(next_link(&HeaderMap::new()), None);
    }
}
