//! Marketplace data types shared by the client, the HTTP surface and the binary.
//!
//! Wire shapes follow the backend's camelCase JSON and its
//! `{ "success": bool, ... }` envelope convention.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Users
// =============================================================================

/// The two marketplace roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Buyer,
    Exporter,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Buyer => write!(f, "buyer"),
            UserType::Exporter => write!(f, "exporter"),
        }
    }
}

/// Identity handed over by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque user id issued by the provider.
    pub uid: String,
    pub email: String,
}

/// User record served by `GET /api/users/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub user_type: UserType,
    pub company: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub plants_saved: Vec<String>,
    pub quotes_requested: Vec<String>,
}

/// Body of `POST /api/users/sync`, sent after registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserRequest {
    #[serde(rename = "firebaseUID")]
    pub firebase_uid: String,
    pub email: String,
    pub name: String,
    pub user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// =============================================================================
// Catalog
// =============================================================================

/// A catalog entry served by `GET /api/plants`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPlant {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Unit price in rupees per plant.
    pub price: f64,
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl CatalogPlant {
    /// The benefits shown on a catalog card (at most two).
    pub fn headline_benefits(&self) -> &[String] {
        &self.benefits[..self.benefits.len().min(2)]
    }

    /// Price label as shown on a catalog card.
    pub fn price_label(&self) -> String {
        format!("₹{}/plant", self.price)
    }

    /// Card call-to-action, which depends on the viewer's role.
    pub fn call_to_action(user_type: UserType) -> &'static str {
        match user_type {
            UserType::Exporter => "Export Inquiry",
            UserType::Buyer => "Get Quote",
        }
    }
}

// =============================================================================
// Quotes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteUnit {
    #[default]
    Plants,
    Kg,
    Tons,
}

impl fmt::Display for QuoteUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteUnit::Plants => write!(f, "plants"),
            QuoteUnit::Kg => write!(f, "kg"),
            QuoteUnit::Tons => write!(f, "tons"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityGrade {
    Standard,
    #[default]
    Premium,
    /// Organic certified.
    Organic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeliveryTimeline {
    #[serde(rename = "15 days")]
    Days15,
    #[default]
    #[serde(rename = "30 days")]
    Days30,
    #[serde(rename = "60 days")]
    Days60,
}

// =============================================================================
// Envelope
// =============================================================================

/// The backend's `{ "success": bool, "error"?: string, ...payload }` envelope.
///
/// Payload types use optional fields so a failed envelope still decodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

/// Payload of the user endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPayload {
    pub user: Option<UserProfile>,
}

/// Payload of `POST /api/quotes/submit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuotePayload {
    pub quote_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_defaults_to_buyer() {
        assert_eq!(UserType::default(), UserType::Buyer);
        let profile: UserProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile.user_type, UserType::Buyer);
        assert!(profile.plants_saved.is_empty());
    }

    #[test]
    fn test_user_profile_camel_case() {
        let json = r#"{
            "name": "Asha",
            "email": "asha@example.com",
            "userType": "exporter",
            "company": "Asha Herbs",
            "country": "India",
            "createdAt": "2024-03-01T10:00:00Z",
            "plantsSaved": ["tulsi"],
            "quotesRequested": ["q1", "q2"]
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.user_type, UserType::Exporter);
        assert_eq!(profile.company.as_deref(), Some("Asha Herbs"));
        assert_eq!(profile.quotes_requested.len(), 2);
        assert!(profile.created_at.is_some());
    }

    #[test]
    fn test_sync_request_wire_names() {
        let req = SyncUserRequest {
            firebase_uid: "uid-1".to_string(),
            email: "a@b.c".to_string(),
            name: "A".to_string(),
            user_type: UserType::Exporter,
            company: None,
            country: Some("India".to_string()),
            phone: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["firebaseUID"], "uid-1");
        assert_eq!(value["userType"], "exporter");
        assert_eq!(value["country"], "India");
        assert!(value.get("company").is_none());
    }

    #[test]
    fn test_catalog_plant_card_helpers() {
        let plant: CatalogPlant = serde_json::from_str(
            r#"{"_id": "p1", "name": "Neem", "price": 120, "benefits": ["a", "b", "c"]}"#,
        )
        .unwrap();
        assert_eq!(plant.id, "p1");
        assert_eq!(plant.headline_benefits(), &["a".to_string(), "b".to_string()]);
        assert_eq!(plant.price_label(), "₹120/plant");
        assert_eq!(CatalogPlant::call_to_action(UserType::Exporter), "Export Inquiry");
        assert_eq!(CatalogPlant::call_to_action(UserType::Buyer), "Get Quote");
    }

    #[test]
    fn test_catalog_plant_without_benefits() {
        let plant: CatalogPlant =
            serde_json::from_str(r#"{"_id": "p2", "name": "Ashwagandha", "price": 99.5}"#).unwrap();
        assert!(plant.headline_benefits().is_empty());
    }

    #[test]
    fn test_timeline_wire_format() {
        assert_eq!(
            serde_json::to_string(&DeliveryTimeline::Days15).unwrap(),
            "\"15 days\""
        );
        assert_eq!(DeliveryTimeline::default(), DeliveryTimeline::Days30);
        assert_eq!(QualityGrade::default(), QualityGrade::Premium);
        assert_eq!(QuoteUnit::default().to_string(), "plants");
    }

    #[test]
    fn test_envelope_failure_decodes_without_payload() {
        let env: Envelope<QuotePayload> =
            serde_json::from_str(r#"{"success": false, "error": "quota exceeded"}"#).unwrap();
        assert!(!env.success);
        assert_eq!(env.error.as_deref(), Some("quota exceeded"));
        assert!(env.payload.quote_id.is_none());
    }

    #[test]
    fn test_envelope_success_with_payload() {
        let env: Envelope<QuotePayload> =
            serde_json::from_str(r#"{"success": true, "quoteId": "Q-42"}"#).unwrap();
        assert!(env.success);
        assert_eq!(env.payload.quote_id.as_deref(), Some("Q-42"));

        let env: Envelope<UserPayload> =
            serde_json::from_str(r#"{"success": true, "user": {"name": "Ravi"}}"#).unwrap();
        assert_eq!(env.payload.user.unwrap().name.as_deref(), Some("Ravi"));
    }
}
