//! Quote requests.
//!
//! [`QuoteDesk::submit`] is fail-open: if the backend is unreachable or
//! refuses the request, the customer still gets a (simulated) confirmation.
//! Only local validation failures reach the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use greenora_core::types::{
    DeliveryTimeline, Identity, QualityGrade, QuoteUnit, UserProfile, UserType,
};

use crate::client::MarketplaceClient;
use crate::error::ClientError;

const DEFAULT_QUANTITY: u32 = 100;

/// The quote form as the customer fills it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteForm {
    pub plant_type: String,
    pub quantity: u32,
    pub unit: QuoteUnit,
    /// Destination country.
    pub destination: String,
    pub quality: QualityGrade,
    pub special_requirements: String,
    pub timeline: DeliveryTimeline,
    pub contact_email: String,
    pub company_name: String,
}

impl Default for QuoteForm {
    fn default() -> Self {
        Self {
            plant_type: String::new(),
            quantity: DEFAULT_QUANTITY,
            unit: QuoteUnit::default(),
            destination: String::new(),
            quality: QualityGrade::default(),
            special_requirements: String::new(),
            timeline: DeliveryTimeline::default(),
            contact_email: String::new(),
            company_name: String::new(),
        }
    }
}

impl QuoteForm {
    /// A fresh form for `plant`, prefilled from whatever is known about the user.
    ///
    /// The contact email prefers the profile over the identity; the company
    /// name is seeded from the profile's display name.
    pub fn prefilled(
        plant: Option<&str>,
        profile: Option<&UserProfile>,
        identity: Option<&Identity>,
    ) -> Self {
        let contact_email = profile
            .and_then(|p| p.email.clone())
            .or_else(|| identity.map(|i| i.email.clone()))
            .unwrap_or_default();
        let company_name = profile.and_then(|p| p.name.clone()).unwrap_or_default();
        Self {
            plant_type: plant.unwrap_or_default().to_string(),
            contact_email,
            company_name,
            ..Self::default()
        }
    }

    /// Plant type and destination are required; quantity must be at least one.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.plant_type.trim().is_empty() {
            return Err(ClientError::Validation("plant type is required".to_string()));
        }
        if self.destination.trim().is_empty() {
            return Err(ClientError::Validation(
                "destination country is required".to_string(),
            ));
        }
        if self.quantity < 1 {
            return Err(ClientError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Confirmation wording, which differs by role.
    pub fn success_message(&self, user_type: UserType) -> String {
        match user_type {
            UserType::Exporter => format!(
                "📦 Export inquiry submitted for {}! We'll connect you with international buyers.",
                self.plant_type
            ),
            UserType::Buyer => format!(
                "💰 Quote request submitted for {} {} of {}!",
                self.quantity, self.unit, self.plant_type
            ),
        }
    }
}

/// Wire body of `POST /api/quotes/submit`: the form plus who is asking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSubmission {
    #[serde(flatten)]
    pub form: QuoteForm,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub user_type: Option<UserType>,
    pub submitted_at: DateTime<Utc>,
}

impl QuoteSubmission {
    pub fn new(form: QuoteForm, identity: Option<&Identity>, profile: Option<&UserProfile>) -> Self {
        Self {
            form,
            user_id: identity.map(|i| i.uid.clone()),
            user_email: profile
                .and_then(|p| p.email.clone())
                .or_else(|| identity.map(|i| i.email.clone())),
            user_name: profile.and_then(|p| p.name.clone()),
            user_type: profile.map(|p| p.user_type),
            submitted_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptSource {
    /// The backend accepted the request.
    Backend,
    /// The backend failed; the confirmation was produced locally.
    Simulated,
}

/// What the customer is told after submitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteReceipt {
    pub source: ReceiptSource,
    pub quote_id: Option<String>,
    pub message: String,
    pub contact_email: Option<String>,
}

impl QuoteReceipt {
    /// Full confirmation text.
    pub fn notice(&self) -> String {
        match self.source {
            ReceiptSource::Backend => {
                let id_line = self
                    .quote_id
                    .as_deref()
                    .map(|id| format!("\nQuote ID: {}", id))
                    .unwrap_or_default();
                format!(
                    "✅ {}{}\n\nWe'll contact you within 24 hours!",
                    self.message, id_line
                )
            }
            ReceiptSource::Simulated => format!(
                "✅ {}\n\n📞 We'll contact you at {} within 24 hours!",
                self.message,
                self.contact_email.as_deref().unwrap_or("your email")
            ),
        }
    }
}

/// Submits quote requests, falling back to a local confirmation on failure.
#[derive(Debug, Clone)]
pub struct QuoteDesk {
    client: MarketplaceClient,
}

impl QuoteDesk {
    pub fn new(client: MarketplaceClient) -> Self {
        Self { client }
    }

    pub async fn submit(
        &self,
        form: &QuoteForm,
        identity: Option<&Identity>,
        profile: Option<&UserProfile>,
    ) -> Result<QuoteReceipt, ClientError> {
        form.validate()?;

        let user_type = profile.map(|p| p.user_type).unwrap_or_default();
        let message = form.success_message(user_type);
        let submission = QuoteSubmission::new(form.clone(), identity, profile);

        match self.client.submit_quote(&submission).await {
            Ok(quote_id) => {
                info!(
                    plant = %form.plant_type,
                    quote_id = quote_id.as_deref().unwrap_or("-"),
                    "Quote submitted"
                );
                Ok(QuoteReceipt {
                    source: ReceiptSource::Backend,
                    quote_id,
                    message,
                    contact_email: submission.user_email,
                })
            }
            Err(e) => {
                warn!(plant = %form.plant_type, error = %e, "Quote backend failed, using fallback submission");
                Ok(QuoteReceipt {
                    source: ReceiptSource::Simulated,
                    quote_id: None,
                    message,
                    contact_email: submission.user_email,
                })
            }
        }
    }
}
