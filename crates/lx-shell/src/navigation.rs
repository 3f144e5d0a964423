//! Address bar input normalization and navigation request bookkeeping.

use lx_config::SearchEngine;
use lx_core::BrowserError;
use lx_core::BrowserResult;
use url::Url;
use url::form_urlencoded;

/// Monotonically increasing id attached to each address bar submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavigationId(u64);

impl NavigationId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for NavigationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues navigation ids; only the latest one is current.
#[derive(Debug, Default, Clone)]
pub struct NavigationCounter {
    latest: u64,
}

impl NavigationCounter {
    pub fn next(&mut self) -> NavigationId {
        self.latest = self.latest.saturating_add(1);
        NavigationId(self.latest)
    }

    pub fn latest(&self) -> Option<NavigationId> {
        (self.latest > 0).then_some(NavigationId(self.latest))
    }

    pub fn is_current(&self, id: NavigationId) -> bool {
        self.latest > 0 && id.0 == self.latest
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub raw_input: String,
    pub id: NavigationId,
}

/// Result reported by a navigation worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
    pub id: NavigationId,
    pub input: String,
    pub result: BrowserResult<Url>,
}

impl NavigationRequest {
    pub fn resolve(self, search: &SearchEngine) -> NavigationOutcome {
        let result = normalize_input(&self.raw_input, search);
        NavigationOutcome {
            id: self.id,
            input: self.raw_input,
            result,
        }
    }
}

/// Turns raw address bar input into a URL to load.
///
/// Explicit URLs are kept, dotted host-like input gets `https://`, anything
/// else becomes a query against `search`.
pub fn normalize_input(raw: &str, search: &SearchEngine) -> BrowserResult<Url> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(BrowserError::new(
            "shell.navigation.empty_input",
            "address bar input is empty",
        ));
    }

    if let Ok(parsed) = Url::parse(input) {
        if !parsed.scheme().is_empty() && is_explicit_scheme(input, parsed.scheme()) {
            return Ok(parsed);
        }
    }

    if input.contains("://") {
        if let Ok(parsed) = Url::parse(input) {
            return Ok(parsed);
        }
    }

    if input.contains('.') {
        // Inputs like `a b.c` do not survive the prefix; those are searched.
        if let Ok(parsed) = Url::parse(&format!("https://{input}")) {
            return Ok(parsed);
        }
    }

    search_url(input, search)
}

/// `example.com:8080` parses with scheme `example.com`. A dotted scheme is
/// only real when followed by `://`.
fn is_explicit_scheme(input: &str, scheme: &str) -> bool {
    let has_authority = input
        .get(scheme.len()..)
        .is_some_and(|rest| rest.starts_with("://"));
    has_authority || !scheme.contains('.')
}

pub fn search_url(query: &str, search: &SearchEngine) -> BrowserResult<Url> {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    let candidate = search.query_url(&encoded);
    Url::parse(&candidate).map_err(|error| {
        BrowserError::new(
            "shell.navigation.search_url_invalid",
            format!("search URL `{candidate}` is invalid: {error}"),
        )
    })
}
