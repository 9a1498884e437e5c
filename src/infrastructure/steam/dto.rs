//! Steam Web API response envelopes.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::entities::ItemDefinition;

/// `ISteamUser/ResolveVanityURL` response.
#[derive(Debug, Deserialize)]
pub struct ResolveVanityEnvelope {
    pub response: ResolveVanityResponse,
}

#[derive(Debug, Deserialize)]
pub struct ResolveVanityResponse {
    /// 1 on success, 42 when no match was found.
    #[serde(default)]
    pub success: i32,
    #[serde(default)]
    pub steamid: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `ILoyaltyRewardsService/GetEquippedProfileItems` response.
#[derive(Debug, Deserialize)]
pub struct EquippedItemsEnvelope {
    #[serde(default)]
    pub response: EquippedItemsResponse,
}

#[derive(Debug, Default, Deserialize)]
pub struct EquippedItemsResponse {
    #[serde(default)]
    pub active_definitions: Vec<ItemDefinition>,
    #[serde(default)]
    pub inactive_definitions: Vec<ItemDefinition>,
}

/// Store `appdetails` response, keyed by app ID.
pub type AppDetailsEnvelope = HashMap<String, AppDetailsEntry>;

#[derive(Debug, Deserialize)]
pub struct AppDetailsEntry {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<AppDetailsData>,
}

#[derive(Debug, Deserialize)]
pub struct AppDetailsData {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve_vanity() {
        let json = r#"{"response":{"steamid":"76561197960287930","success":1}}"#;
        let envelope: ResolveVanityEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.response.success, 1);
        assert_eq!(envelope.response.steamid.as_deref(), Some("76561197960287930"));

        let json = r#"{"response":{"success":42,"message":"No match"}}"#;
        let envelope: ResolveVanityEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.response.steamid.is_none());
        assert_eq!(envelope.response.message.as_deref(), Some("No match"));
    }

    #[test]
    fn test_parse_app_details() {
        let json = r#"{"440":{"success":true,"data":{"type":"game","name":"Team Fortress 2","steam_appid":440}}}"#;
        let envelope: AppDetailsEnvelope = serde_json::from_str(json).unwrap();
        let entry = &envelope["440"];
        assert!(entry.success);
        assert_eq!(entry.data.as_ref().unwrap().name, "Team Fortress 2");

        let json = r#"{"1":{"success":false}}"#;
        let envelope: AppDetailsEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope["1"].data.is_none());
    }

    #[test]
    fn test_parse_equipped_items_empty_response() {
        let envelope: EquippedItemsEnvelope = serde_json::from_str(r#"{"response":{}}"#).unwrap();
        assert!(envelope.response.active_definitions.is_empty());
        assert!(envelope.response.inactive_definitions.is_empty());
    }
}
