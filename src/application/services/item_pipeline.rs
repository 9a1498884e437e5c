//! Equipped profile items and their market enrichment.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use reqwest::Url;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::entities::{DisplayItem, SteamId64};
use crate::domain::errors::EngineError;
use crate::domain::ports::{HttpPort, HttpResponse};
use crate::infrastructure::config::HttpConfig;
use crate::infrastructure::steam::dto::EquippedItemsEnvelope;
use crate::infrastructure::steam::patterns;

const EQUIPPED_ITEMS_URL: &str =
    "https://api.steampowered.com/ILoyaltyRewardsService/GetEquippedProfileItems/v1";
/// Market listings live under the Steam community app (753).
const MARKET_LISTINGS_URL: &str = "https://steamcommunity.com/market/listings/753";
const PRICE_HISTOGRAM_URL: &str = "https://steamcommunity.com/market/itemordershistogram";

/// Builds the market listing page URL for an item.
///
/// # Errors
/// Returns `EngineError::Format` if the base URL cannot take path segments.
pub fn market_listing_url(appid: u32, item_name: &str) -> Result<String, EngineError> {
    let mut url = Url::parse(MARKET_LISTINGS_URL)
        .map_err(|e| EngineError::format(format!("invalid market URL: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| EngineError::format("market URL cannot be a base"))?
        .push(&format!("{appid}-{item_name}"));
    Ok(url.into())
}

/// Outcome of a market listing page lookup.
#[derive(Debug, PartialEq, Eq)]
struct MarketListing {
    uri: String,
    listing_id: Option<u64>,
}

/// Fetches equipped items and enriches them with market data.
///
/// Enrichment runs one spawned task per item, bounded by a semaphore shared
/// by every call on this pipeline. Spawned tasks finish even if the caller
/// stops waiting.
#[derive(Clone)]
pub struct ItemPipeline {
    http: Arc<dyn HttpPort>,
    permits: Arc<Semaphore>,
    market_timeout: Duration,
}

impl ItemPipeline {
    /// Creates new pipeline.
    #[must_use]
    pub fn new(http: Arc<dyn HttpPort>, config: &HttpConfig) -> Self {
        Self {
            http,
            permits: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
            market_timeout: config.market_timeout(),
        }
    }

    /// Lists the active and inactive equipped item definitions of an account
    /// as display items, active ones first.
    ///
    /// # Errors
    /// Returns `EngineError::Transport` if the service cannot be reached and
    /// `EngineError::Format` if the payload cannot be decoded.
    pub async fn list_equipped_items(
        &self,
        steam64: SteamId64,
        language: &str,
    ) -> Result<Vec<DisplayItem>, EngineError> {
        let url = Url::parse_with_params(
            EQUIPPED_ITEMS_URL,
            &[("steamid", steam64.to_string().as_str()), ("language", language)],
        )
        .map_err(|e| EngineError::format(format!("invalid equipped items request: {e}")))?;

        let body = self.http.get(url.as_str(), None).await?.into_body()?;
        let envelope: EquippedItemsEnvelope = serde_json::from_str(&body)?;
        let response = envelope.response;

        let items: Vec<DisplayItem> = response
            .active_definitions
            .iter()
            .map(|definition| DisplayItem::from_definition(definition, true))
            .chain(
                response
                    .inactive_definitions
                    .iter()
                    .map(|definition| DisplayItem::from_definition(definition, false)),
            )
            .collect();

        debug!(steam64 = %steam64, count = items.len(), "Listed equipped items");
        Ok(items)
    }

    /// Attaches market listing URIs, listing IDs and prices to every item
    /// that has no market URI yet.
    ///
    /// Always returns one item per input, in input order. Items whose lookup
    /// failed come back unchanged.
    pub async fn enrich_with_market_data(
        &self,
        items: Vec<DisplayItem>,
        currency: u32,
    ) -> Vec<DisplayItem> {
        let handles: Vec<_> = items
            .into_iter()
            .map(|item| {
                let pipeline = self.clone();
                let fallback = item.clone();
                let handle = tokio::spawn(async move { pipeline.enrich_item(item, currency).await });
                (handle, fallback)
            })
            .collect();

        let (handles, fallbacks): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        join_all(handles)
            .await
            .into_iter()
            .zip(fallbacks)
            .map(|(joined, fallback)| {
                joined.unwrap_or_else(|e| {
                    warn!(item = %fallback.item_name, error = %e, "Enrichment task failed");
                    fallback
                })
            })
            .collect()
    }

    async fn enrich_item(&self, mut item: DisplayItem, currency: u32) -> DisplayItem {
        if item.has_market_uri() {
            return item;
        }

        let Ok(_permit) = self.permits.acquire().await else {
            return item;
        };

        match self.find_market_listing(&item).await {
            Ok(Some(listing)) => {
                item.item_market_uri = listing.uri;
                if let Some(listing_id) = listing.listing_id {
                    item.item_market_id = listing_id;
                    item = self.fetch_market_price(item, currency).await;
                }
            }
            Ok(None) => debug!(item = %item.item_name, "No exact market listing"),
            Err(e) => warn!(item = %item.item_name, error = %e, "Market listing lookup failed"),
        }
        item
    }

    async fn find_market_listing(
        &self,
        item: &DisplayItem,
    ) -> Result<Option<MarketListing>, EngineError> {
        let uri = market_listing_url(item.appid, &item.item_name)?;
        let body = self
            .http
            .get(&uri, Some(self.market_timeout))
            .await?
            .into_body()?;

        if patterns::has_search_results(&body) {
            return Ok(None);
        }

        let listing_id = patterns::extract_order_spread_id(&body);
        Ok(Some(MarketListing { uri, listing_id }))
    }

    /// Fills in the promoted market price of an item with a listing ID.
    ///
    /// A missing price or failed request leaves the price empty.
    pub async fn fetch_market_price(&self, mut item: DisplayItem, currency: u32) -> DisplayItem {
        if !item.has_market_id() {
            debug!(item = %item.item_name, "No market listing ID, skipping price lookup");
            return item;
        }

        let url = format!(
            "{PRICE_HISTOGRAM_URL}?language=english&currency={currency}&item_nameid={}",
            item.item_market_id
        );
        let body = self
            .http
            .get(&url, Some(self.market_timeout))
            .await
            .and_then(HttpResponse::into_body);

        match body {
            Ok(body) => match patterns::extract_promoted_price(&body) {
                Some(price) => item.item_market_price = price,
                None => debug!(item = %item.item_name, "No promoted price in histogram"),
            },
            Err(e) => warn!(item = %item.item_name, error = %e, "Market price lookup failed"),
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockHttpPort;
    use crate::domain::ports::mocks::StubHttp;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LISTINGS_PREFIX: &str = "https://steamcommunity.com/market/listings/753/";
    const HISTOGRAM_PREFIX: &str = "https://steamcommunity.com/market/itemordershistogram";

    const LISTING_PAGE: &str = r"<html><script>
        $J(function() { Market_LoadOrderSpread( 176321160 ); });
        </script></html>";
    const LISTING_PAGE_WITHOUT_ID: &str = "<html><div id=\"largeiteminfo\"></div></html>";
    const SEARCH_PAGE: &str = r#"<html><div id="searchResultsTable">
        <div class="market_content_block market_home_listing_table market_home_main_listing_table market_listing_table"></div>
        </div></html>"#;
    const HISTOGRAM: &str = r#"{"success":1,"sell_order_summary":"<span class=\"market_commodity_orders_header_promote\">3<\/span> for sale starting at <span class=\"market_commodity_orders_header_promote\">$0.12<\/span>","buy_order_summary":""}"#;

    const EQUIPPED_ITEMS: &str = r#"{"response":{
        "active_definitions":[
            {"appid":440,"defid":1,"point_cost":"1000","active":true,
             "community_item_data":{"item_name":"Frame","animated":true,"item_movie_mp4":"f.mp4","item_image_small":"f.png"}}
        ],
        "inactive_definitions":[
            {"appid":730,"defid":2,"point_cost":"500",
             "community_item_data":{"item_name":"Avatar","item_image_large":"a.png"}},
            {"appid":570,"defid":3,
             "community_item_data":{"item_name":"Background","item_image_large":"b.jpg"}}
        ]}}"#;

    fn pipeline(http: Arc<dyn HttpPort>) -> ItemPipeline {
        ItemPipeline::new(http, &HttpConfig::default())
    }

    fn item(appid: u32, name: &str) -> DisplayItem {
        DisplayItem {
            appid,
            item_name: name.to_string(),
            ..DisplayItem::default()
        }
    }

    #[test]
    fn test_market_listing_url_encodes_name() {
        assert_eq!(
            market_listing_url(440, "Sale Badge").unwrap(),
            "https://steamcommunity.com/market/listings/753/440-Sale%20Badge"
        );
    }

    #[tokio::test]
    async fn test_list_equipped_items() {
        let http = Arc::new(StubHttp::new().ok(EQUIPPED_ITEMS_URL, EQUIPPED_ITEMS));
        let steam64: SteamId64 = "76561197960287930".parse().unwrap();

        let items = pipeline(http.clone())
            .list_equipped_items(steam64, "english")
            .await
            .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items.iter().filter(|i| i.is_active_definition).count(), 1);
        let frame = items.iter().find(|i| i.item_name == "Frame").unwrap();
        assert_eq!(frame.item_image_uri, "f.mp4");
        let background = items.iter().find(|i| i.item_name == "Background").unwrap();
        assert_eq!(background.item_image_uri, "b.jpg");
        assert_eq!(
            background.item_points_uri,
            "https://store.steampowered.com/points/shop/app/570/reward/3/"
        );
        assert!(items.iter().all(|i| !i.has_market_uri() && i.item_market_id == 0));
        assert!(http.calls()[0].contains("steamid=76561197960287930&language=english"));
    }

    #[tokio::test]
    async fn test_list_equipped_items_propagates_errors() {
        let http = StubHttp::new().ok(EQUIPPED_ITEMS_URL, "not json");
        let steam64: SteamId64 = "76561197960287930".parse().unwrap();

        let err = pipeline(Arc::new(http))
            .list_equipped_items(steam64, "english")
            .await
            .unwrap_err();

        assert!(err.is_format());
    }

    #[tokio::test]
    async fn test_enrichment_counts_and_isolation() {
        let http = Arc::new(
            StubHttp::new()
                .ok(&format!("{LISTINGS_PREFIX}440-Listed"), LISTING_PAGE)
                .ok(&format!("{LISTINGS_PREFIX}440-NoId"), LISTING_PAGE_WITHOUT_ID)
                .ok(&format!("{LISTINGS_PREFIX}440-Unlisted"), SEARCH_PAGE)
                .route(
                    &format!("{LISTINGS_PREFIX}440-Broken"),
                    Err(EngineError::transport("timed out")),
                )
                .ok(HISTOGRAM_PREFIX, HISTOGRAM),
        );
        let items = vec![
            item(440, "Listed"),
            item(440, "NoId"),
            item(440, "Unlisted"),
            item(440, "Broken"),
        ];

        let enriched = pipeline(http.clone()).enrich_with_market_data(items, 1).await;

        assert_eq!(enriched.len(), 4);
        assert_eq!(http.count(LISTINGS_PREFIX), 4);
        assert_eq!(http.count(HISTOGRAM_PREFIX), 1);

        let listed = &enriched[0];
        assert_eq!(listed.item_market_uri, format!("{LISTINGS_PREFIX}440-Listed"));
        assert_eq!(listed.item_market_id, 176_321_160);
        assert_eq!(listed.item_market_price, "$0.12");

        let no_id = &enriched[1];
        assert!(no_id.has_market_uri());
        assert_eq!(no_id.item_market_id, 0);
        assert!(no_id.item_market_price.is_empty());

        for unenriched in &enriched[2..] {
            assert!(!unenriched.has_market_uri());
            assert_eq!(unenriched.item_market_id, 0);
            assert!(unenriched.item_market_price.is_empty());
        }
        assert_eq!(enriched[3].item_name, "Broken");
    }

    #[tokio::test]
    async fn test_enriched_items_are_skipped() {
        let http = Arc::new(StubHttp::new());
        let mut done = item(440, "Listed");
        done.item_market_uri = format!("{LISTINGS_PREFIX}440-Listed");
        done.item_market_id = 9;
        done.item_market_price = "$1.00".to_string();

        let enriched = pipeline(http.clone())
            .enrich_with_market_data(vec![done.clone()], 1)
            .await;

        assert_eq!(enriched, vec![done]);
        assert!(http.calls().is_empty());
    }

    /// Records the peak number of concurrent requests.
    #[derive(Default)]
    struct GaugeHttp {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl HttpPort for GaugeHttp {
        async fn get(
            &self,
            _url: &str,
            _timeout: Option<Duration>,
        ) -> Result<HttpResponse, EngineError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            for _ in 0..8 {
                tokio::task::yield_now().await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(HttpResponse::ok(SEARCH_PAGE))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_enrichment_respects_concurrency_bound() {
        let http = Arc::new(GaugeHttp::default());
        let config = HttpConfig {
            max_concurrency: 2,
            ..HttpConfig::default()
        };
        let items: Vec<_> = (0..12).map(|i| item(440, &format!("Item{i}"))).collect();

        let enriched = ItemPipeline::new(http.clone(), &config)
            .enrich_with_market_data(items, 1)
            .await;

        let names: Vec<_> = enriched.iter().map(|i| i.item_name.as_str()).collect();
        let expected: Vec<_> = (0..12).map(|i| format!("Item{i}")).collect();
        assert_eq!(names, expected);
        assert!(http.peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(http.in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_market_price_uses_currency_and_timeout() {
        let mut http = MockHttpPort::new();
        http.expect_get()
            .withf(|url, timeout| {
                url.starts_with(HISTOGRAM_PREFIX)
                    && url.contains("currency=3")
                    && url.contains("item_nameid=42")
                    && *timeout == Some(Duration::from_secs(10))
            })
            .times(1)
            .returning(|_, _| Ok(HttpResponse::ok(HISTOGRAM)));
        let mut listed = item(440, "Listed");
        listed.item_market_id = 42;

        let priced = pipeline(Arc::new(http)).fetch_market_price(listed, 3).await;

        assert_eq!(priced.item_market_price, "$0.12");
    }

    #[tokio::test]
    async fn test_fetch_market_price_without_match_leaves_price_empty() {
        let http = Arc::new(StubHttp::new().ok(HISTOGRAM_PREFIX, r#"{"success":16}"#));
        let mut listed = item(440, "Listed");
        listed.item_market_id = 42;

        let priced = pipeline(http).fetch_market_price(listed.clone(), 1).await;

        assert_eq!(priced, listed);
    }

    #[tokio::test]
    async fn test_fetch_market_price_without_listing_id_is_noop() {
        let mut http = MockHttpPort::new();
        http.expect_get().never();

        let unlisted = item(440, "Unlisted");
        let result = pipeline(Arc::new(http)).fetch_market_price(unlisted.clone(), 1).await;

        assert_eq!(result, unlisted);
    }
}
