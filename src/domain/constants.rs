//! Site characteristics and domain constants
//!
//! Constants specific to www.national.co.uk and default limits for the
//! scraping pipeline.

/// www.national.co.uk site constants
pub mod site {
    /// Site base URL (no trailing slash; path templates supply their own)
    pub const BASE_URL: &str = "https://www.national.co.uk";

    /// Tyre search path template: width, aspect ratio and rim size joined
    /// by hyphens, postcode as the `pc` query parameter
    pub const SEARCH_PATH_PREFIX: &str = "/tyres-search/";

    /// CSS selector for one tyre listing container on a results page
    pub const TYRE_CONTAINER_SELECTOR: &str = "div.tyreDisplay";

    /// CSS selector for the pattern-name link nested in a container
    pub const PATTERN_LINK_SELECTOR: &str = "a.pattern_link";
}

/// Default limits and timings for the scraping pipeline
pub mod scraping {
    /// Fixed politeness delay before every page request (milliseconds)
    pub const DEFAULT_REQUEST_DELAY_MS: u64 = 2000;

    /// Default HTTP request timeout (seconds)
    pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Stable browser identity sent with every request; fixed, never rotated
    pub const DEFAULT_USER_AGENT: &str =
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) Gecko/20100101 Firefox/109.0";
}

/// Default storage locations and limits
pub mod storage {
    /// SQLite database file, relative to the working directory
    pub const DEFAULT_DATABASE_PATH: &str = "tyres.db";

    /// CSV export file, fully rewritten after every successful scrape
    pub const DEFAULT_EXPORT_PATH: &str = "tyres.csv";

    /// Bounded wait for the SQLite write lock before giving up (seconds)
    pub const DEFAULT_BUSY_TIMEOUT_SECONDS: u64 = 10;
}
