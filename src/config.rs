use clap::Parser;

pub const DEFAULT_QUERY: &str = "redux";
pub const DEFAULT_HPP: u32 = 100;
pub const PATH_BASE: &str = "https://hn.algolia.com/api/v1";

/// Startup options. Every flag can also come from the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "hn_search", about = "Search and browse Hacker News stories")]
pub struct Config {
    /// Term searched on startup
    #[arg(long, env = "HN_SEARCH_QUERY", default_value = DEFAULT_QUERY)]
    pub query: String,

    /// Results requested per page
    #[arg(
        long,
        env = "HN_SEARCH_HITS_PER_PAGE",
        default_value_t = DEFAULT_HPP,
        value_parser = clap::value_parser!(u32).range(1..=1000)
    )]
    pub hits_per_page: u32,

    /// Search API root
    #[arg(long, env = "HN_SEARCH_BASE_URL", default_value = PATH_BASE)]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HN_SEARCH_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            hits_per_page: DEFAULT_HPP,
            base_url: PATH_BASE.to_string(),
            timeout_secs: 60,
        }
    }
}
