use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

use crate::config::Config;
use crate::models::SearchResponse;

const PATH_SEARCH: &str = "/search";
const PARAM_SEARCH: &str = "query=";
const PARAM_PAGE: &str = "page=";
const PARAM_HPP: &str = "hitsPerPage=";

/// Fetches result pages from the Algolia Hacker News search API.
#[derive(Clone)]
pub struct AlgoliaClient {
    client: Client,
    base_url: String,
    hits_per_page: u32,
}

impl AlgoliaClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("hn_search/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            hits_per_page: config.hits_per_page,
        })
    }

    pub fn search_url(&self, term: &str, page: u32) -> String {
        format!(
            "{}{}?{}{}&{}{}&{}{}",
            self.base_url,
            PATH_SEARCH,
            PARAM_SEARCH,
            urlencoding::encode(term),
            PARAM_PAGE,
            page,
            PARAM_HPP,
            self.hits_per_page
        )
    }

    pub fn fetch_page(&self, term: &str, page: u32) -> Result<SearchResponse> {
        let url = self.search_url(term, page);
        tracing::debug!(%url, "requesting search page");

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("search request for '{}' page {} failed with {}", term, page, status));
        }

        let body = response.text()?;
        Self::parse_page(term, &body)
    }

    /// Parse a `/search` body. The caller keeps track of which term and page
    /// it asked for; the echoed `page` is only logged.
    pub fn parse_page(term: &str, body: &str) -> Result<SearchResponse> {
        let response: SearchResponse = serde_json::from_str(body)
            .with_context(|| format!("malformed search response for '{}'", term))?;

        tracing::debug!(
            term,
            page = response.page,
            pages = response.nb_pages,
            hits = response.hits.len(),
            "parsed search page"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_carries_query_page_and_hits_per_page() {
        let config = Config {
            base_url: "https://hn.algolia.com/api/v1/".to_string(),
            hits_per_page: 50,
            ..Config::default()
        };
        let client = AlgoliaClient::new(&config).unwrap();

        assert_eq!(
            client.search_url("rust lang&co", 2),
            "https://hn.algolia.com/api/v1/search?query=rust%20lang%26co&page=2&hitsPerPage=50"
        );
    }

    #[test]
    fn parse_page_reads_hits_in_order() {
        let body = r#"{
            "hits": [
                {"objectID": "1", "title": "Redux 4.0", "author": "dan", "url": "https://redux.js.org",
                 "num_comments": 12, "points": 300, "created_at_i": 1500000000},
                {"objectID": "2", "title": null, "author": "acemarke", "url": null,
                 "num_comments": null, "points": 4}
            ],
            "page": 1,
            "nbPages": 20,
            "hitsPerPage": 2
        }"#;

        let page = AlgoliaClient::parse_page("redux", body).unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.nb_pages, 20);
        assert_eq!(page.hits.len(), 2);
        assert_eq!(page.hits[0].id, "1");
        assert_eq!(page.hits[0].points, 300);
        assert_eq!(page.hits[0].created_at_i, Some(1_500_000_000));
        assert_eq!(page.hits[1].title, "");
        assert_eq!(page.hits[1].num_comments, 0);
    }

    #[test]
    fn parse_page_rejects_garbage() {
        assert!(AlgoliaClient::parse_page("redux", "<html>rate limited</html>").is_err());
    }
}
