use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// One search result record. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Hit {
    #[serde(rename = "objectID")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub num_comments: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: i64,
    #[serde(default)]
    pub created_at_i: Option<i64>, // Unix seconds
}

// Algolia sends `null` for fields a record doesn't carry (e.g. comments have no title)
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Hit {
    /// Host part of the story link, empty for self posts.
    pub fn domain(&self) -> String {
        reqwest::Url::parse(&self.url)
            .ok()
            .and_then(|url| url.host_str().map(|host| host.trim_start_matches("www.").to_string()))
            .unwrap_or_default()
    }

    pub fn time_ago(&self) -> String {
        self.time_ago_at(Utc::now())
    }

    pub fn time_ago_at(&self, now: DateTime<Utc>) -> String {
        let Some(created) = self.created_at_i.and_then(|secs| DateTime::from_timestamp(secs, 0)) else {
            return String::new();
        };

        let age = now.signed_duration_since(created);
        let (amount, unit) = if age.num_days() > 0 {
            (age.num_days(), "day")
        } else if age.num_hours() > 0 {
            (age.num_hours(), "hour")
        } else if age.num_minutes() > 0 {
            (age.num_minutes(), "minute")
        } else {
            return "just now".to_string();
        };

        let plural = if amount == 1 { "" } else { "s" };
        format!("{} {}{} ago", amount, unit, plural)
    }

    /// Case-insensitive title match used by the local filter box.
    pub fn matches_title(&self, pattern: &str) -> bool {
        pattern.is_empty() || self.title.to_lowercase().contains(&pattern.to_lowercase())
    }
}

/// One fetch response, tagged with the term it was requested for.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub term: String,
    pub page: u32,
    pub hits: Vec<Hit>,
}

/// Accumulated pages for a single search term. Hits are kept in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub hits: Vec<Hit>,
    pub page: u32,
}

/// Envelope returned by the `/search` endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<Hit>,
    #[serde(default)]
    pub page: u32,
    #[serde(rename = "nbPages", default)]
    pub nb_pages: u32,
}

#[cfg(test)]
pub(crate) fn hit(id: &str, title: &str, author: &str, num_comments: u32, points: i64) -> Hit {
    Hit {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        url: format!("https://example.com/{}", id),
        num_comments,
        points,
        created_at_i: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_missing_fields_fall_back_to_defaults() {
        let json = r#"{"objectID":"42","title":null,"author":"pg","points":null}"#;
        let hit: Hit = serde_json::from_str(json).unwrap();

        assert_eq!(hit.id, "42");
        assert_eq!(hit.title, "");
        assert_eq!(hit.author, "pg");
        assert_eq!(hit.url, "");
        assert_eq!(hit.num_comments, 0);
        assert_eq!(hit.points, 0);
        assert_eq!(hit.created_at_i, None);
    }

    #[test]
    fn domain_strips_www_and_path() {
        let mut item = hit("1", "Redux", "dan", 0, 0);
        item.url = "https://www.github.com/reduxjs/redux".to_string();
        assert_eq!(item.domain(), "github.com");

        item.url = String::new();
        assert_eq!(item.domain(), "");
    }

    #[test]
    fn time_ago_picks_largest_unit() {
        let now = DateTime::from_timestamp(1_000_000, 0).unwrap();
        let mut item = hit("1", "t", "a", 0, 0);

        assert_eq!(item.time_ago_at(now), "");

        item.created_at_i = Some(1_000_000 - 3 * 3600 - 20);
        assert_eq!(item.time_ago_at(now), "3 hours ago");

        item.created_at_i = Some(1_000_000 - 86_400);
        assert_eq!(item.time_ago_at(now), "1 day ago");

        item.created_at_i = Some(1_000_000 - 10);
        assert_eq!(item.time_ago_at(now), "just now");
    }

    #[test]
    fn title_filter_ignores_case() {
        let item = hit("1", "Getting Started with Redux", "dan", 0, 0);
        assert!(item.matches_title("redux"));
        assert!(item.matches_title(""));
        assert!(!item.matches_title("mobx"));
    }
}
