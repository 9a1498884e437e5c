//! Loyalty reward item records.

use serde::{Deserialize, Serialize};

const POINTS_SHOP_BASE: &str = "https://store.steampowered.com/points/shop/app";

/// Media block embedded in an item definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ItemMedia {
    pub item_name: String,
    pub item_title: String,
    pub item_description: String,
    pub item_image_large: String,
    pub item_image_small: String,
    pub item_movie_webm: String,
    pub item_movie_mp4: String,
    pub item_movie_webm_small: String,
    pub item_movie_mp4_small: String,
    pub animated: bool,
}

impl ItemMedia {
    /// Picks the URI shown for this item.
    ///
    /// Animated items prefer the MP4 movie, then the WEBM movie, then the
    /// small still. Static items always use the large still.
    #[must_use]
    pub fn display_uri(&self) -> &str {
        if !self.animated {
            return &self.item_image_large;
        }
        [&self.item_movie_mp4, &self.item_movie_webm]
            .into_iter()
            .find(|uri| !uri.is_empty())
            .unwrap_or(&self.item_image_small)
    }
}

/// Raw item definition as returned by the loyalty rewards service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ItemDefinition {
    pub appid: u32,
    pub defid: u64,
    #[serde(rename = "type")]
    pub item_type: i32,
    pub community_item_class: i32,
    pub community_item_type: i32,
    pub point_cost: String,
    pub timestamp_created: i64,
    pub timestamp_updated: i64,
    pub timestamp_available: i64,
    pub timestamp_available_end: i64,
    pub quantity: String,
    pub internal_description: String,
    pub active: bool,
    pub community_item_data: ItemMedia,
    pub usable_duration: i64,
    pub bundle_discount: i32,
    pub bundle_defids: Vec<u64>,
}

impl ItemDefinition {
    /// Returns the points shop page for this reward.
    #[must_use]
    pub fn points_shop_uri(&self) -> String {
        format!("{POINTS_SHOP_BASE}/{}/reward/{}/", self.appid, self.defid)
    }
}

/// Caller-facing projection of an [`ItemDefinition`] plus market data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
    /// Owning application ID.
    pub appid: u32,
    /// Definition ID within the application.
    pub defid: u64,
    /// Community item class code.
    pub community_item_class: i32,
    /// Market hash name of the item.
    pub item_name: String,
    /// Human-readable title.
    pub item_title: String,
    /// Cost in points, as reported by the service.
    pub point_cost: String,
    /// Item description.
    pub item_description: String,
    /// Whether the definition is currently purchasable.
    pub active: bool,
    /// Internal description.
    pub internal_description: String,
    /// Whether the item has motion media.
    pub animated: bool,
    /// Whether the item came from the active definitions list.
    pub is_active_definition: bool,
    /// Selected media URI.
    pub item_image_uri: String,
    /// Points shop page.
    pub item_points_uri: String,
    /// Community market listing page, empty until enriched or when unlisted.
    pub item_market_uri: String,
    /// Market listing (order spread) ID, 0 until found.
    pub item_market_id: u64,
    /// Promoted market price, empty until scraped.
    pub item_market_price: String,
}

impl DisplayItem {
    /// Projects a raw definition into a display item.
    #[must_use]
    pub fn from_definition(definition: &ItemDefinition, is_active_definition: bool) -> Self {
        let media = &definition.community_item_data;
        Self {
            appid: definition.appid,
            defid: definition.defid,
            community_item_class: definition.community_item_class,
            item_name: media.item_name.clone(),
            item_title: media.item_title.clone(),
            point_cost: definition.point_cost.clone(),
            item_description: media.item_description.clone(),
            active: definition.active,
            internal_description: definition.internal_description.clone(),
            animated: media.animated,
            is_active_definition,
            item_image_uri: media.display_uri().to_string(),
            item_points_uri: definition.points_shop_uri(),
            item_market_uri: String::new(),
            item_market_id: 0,
            item_market_price: String::new(),
        }
    }

    /// Returns whether a market listing page has been attached.
    #[must_use]
    pub fn has_market_uri(&self) -> bool {
        !self.item_market_uri.is_empty()
    }

    /// Returns whether a market listing ID has been found.
    #[must_use]
    pub const fn has_market_id(&self) -> bool {
        self.item_market_id != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn media(animated: bool, mp4: &str, webm: &str) -> ItemMedia {
        ItemMedia {
            item_name: "753-Sale Badge".to_string(),
            item_image_large: "large.png".to_string(),
            item_image_small: "small.png".to_string(),
            item_movie_mp4: mp4.to_string(),
            item_movie_webm: webm.to_string(),
            animated,
            ..ItemMedia::default()
        }
    }

    #[test_case(false, "a.mp4", "a.webm", "large.png" ; "static_uses_large")]
    #[test_case(true, "a.mp4", "a.webm", "a.mp4" ; "animated_prefers_mp4")]
    #[test_case(true, "", "a.webm", "a.webm" ; "animated_falls_back_to_webm")]
    #[test_case(true, "", "", "small.png" ; "animated_falls_back_to_small")]
    fn test_display_uri(animated: bool, mp4: &str, webm: &str, expected: &str) {
        assert_eq!(media(animated, mp4, webm).display_uri(), expected);
    }

    #[test]
    fn test_from_definition() {
        let definition = ItemDefinition {
            appid: 440,
            defid: 12,
            community_item_class: 3,
            point_cost: "2000".to_string(),
            active: true,
            community_item_data: media(false, "", ""),
            ..ItemDefinition::default()
        };

        let item = DisplayItem::from_definition(&definition, false);

        assert_eq!(item.appid, 440);
        assert_eq!(item.item_name, "753-Sale Badge");
        assert_eq!(item.item_image_uri, "large.png");
        assert_eq!(
            item.item_points_uri,
            "https://store.steampowered.com/points/shop/app/440/reward/12/"
        );
        assert!(!item.is_active_definition);
        assert!(!item.has_market_uri());
        assert!(!item.has_market_id());
        assert!(item.item_market_price.is_empty());
    }

    #[test]
    fn test_definition_deserializes_with_missing_fields() {
        let json = r#"{
            "appid": 730,
            "defid": 99,
            "type": 1,
            "point_cost": "500",
            "community_item_data": { "item_name": "Frame", "animated": true, "item_movie_webm": "f.webm" }
        }"#;

        let definition: ItemDefinition = serde_json::from_str(json).unwrap();

        assert_eq!(definition.item_type, 1);
        assert_eq!(definition.community_item_data.display_uri(), "f.webm");
        assert!(definition.bundle_defids.is_empty());
    }
}
