//! Text patterns for data embedded in Steam pages and URLs.
//!
//! None of these formats are contracted; every pattern sits behind one
//! function so a markup change breaks exactly one test.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::SteamId32;
use crate::domain::errors::EngineError;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($regex).expect("Invalid regex"));
    };
}

regex!(APP_ID_FILE_REGEX, r"^(\d+)\.[\da-z]+$");
regex!(APP_ID_SEGMENT_REGEX, r"^\d+$");
regex!(STEAM64_FORM_REGEX, r"^7\d{15}[02468]$");
regex!(
    PROFILE_URL_REGEX,
    r"^https?://steamcommunity\.com/(?:id|profiles)/([^/?#]+)/?(?:[?#].*)?$"
);
regex!(LEGACY_ID_REGEX, r"^STEAM_0:(\d+):(\d+)$");
regex!(
    STYLE_BACKGROUND_REGEX,
    r#"background-image:\s*url\(\s*['"]?([^'")]*?)['"]?\s*\)"#
);
regex!(
    SEARCH_RESULTS_REGEX,
    r#"<div id="searchResultsTable"[\s\S]*?class="market_content_block market_home_listing_table market_home_main_listing_table market_listing_table">"#
);
regex!(ORDER_SPREAD_REGEX, r"Market_LoadOrderSpread\(\s*(\d+)\s*\);");
regex!(
    PROMOTED_PRICE_REGEX,
    r#"<span class=\\"market_commodity_orders_header_promote\\">([^<]*)<\\/span>","#
);

/// Returns the last digit run that forms a whole path segment followed by
/// `/`, or the stem of a trailing file name.
///
/// `https://store.steampowered.com/app/440/` yields `440`, and
/// `https://cdn.example/apps/730.jpg` yields `730`. Digits inside hashes,
/// slugs or the port are ignored.
#[must_use]
pub fn extract_app_id(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let (dirs, file) = path.rsplit_once('/')?;

    if let Some(stem) = APP_ID_FILE_REGEX.captures(file).and_then(|caps| caps.get(1)) {
        return Some(stem.as_str());
    }
    dirs.rsplit('/')
        .find(|segment| APP_ID_SEGMENT_REGEX.is_match(segment))
}

/// Returns whether `identifier` looks like a 64-bit community ID rather than
/// a vanity name.
#[must_use]
pub fn is_steam64_form(identifier: &str) -> bool {
    STEAM64_FORM_REGEX.is_match(identifier)
}

/// Returns the vanity name or 64-bit ID of a community profile URL.
#[must_use]
pub fn extract_profile_identifier(url: &str) -> Option<&str> {
    PROFILE_URL_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parses a `STEAM_0:<universe_bit>:<account>` string.
///
/// # Errors
/// Returns `EngineError::Format` if the value does not match.
pub fn parse_legacy_steam_id(value: &str) -> Result<SteamId32, EngineError> {
    let caps = LEGACY_ID_REGEX
        .captures(value.trim())
        .ok_or_else(|| EngineError::format(format!("unexpected legacy ID {value:?}")))?;

    let parse = |idx: usize| {
        caps[idx]
            .parse::<u32>()
            .map_err(|e| EngineError::format(format!("invalid legacy ID part in {value:?}: {e}")))
    };

    SteamId32::from_legacy_parts(parse(1)?, parse(2)?)
}

/// Extracts the URL of a `background-image: url(...)` declaration.
#[must_use]
pub fn extract_style_background(style: &str) -> Option<String> {
    STYLE_BACKGROUND_REGEX
        .captures(style)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Returns whether a market page shows search results instead of a listing.
#[must_use]
pub fn has_search_results(body: &str) -> bool {
    SEARCH_RESULTS_REGEX.is_match(body)
}

/// Extracts the listing ID passed to `Market_LoadOrderSpread(...)`.
#[must_use]
pub fn extract_order_spread_id(body: &str) -> Option<u64> {
    ORDER_SPREAD_REGEX
        .captures(body)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extracts the promoted price from an order histogram payload.
#[must_use]
pub fn extract_promoted_price(body: &str) -> Option<String> {
    PROMOTED_PRICE_REGEX
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Returns whether an API body reports a rejected key.
#[must_use]
pub fn is_not_authorized(body: &str) -> bool {
    body.to_ascii_lowercase().contains("not authorized")
}
