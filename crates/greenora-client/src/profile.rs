//! User profile loading and the dashboard view built from it.
//!
//! Both backend calls here are fail-open: errors are logged and the caller
//! carries on with identity data alone.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use greenora_core::types::{Identity, SyncUserRequest, UserProfile, UserType};

use crate::client::MarketplaceClient;

/// Placeholder for profile fields the user never filled in.
pub const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone)]
pub struct ProfileLoader {
    client: MarketplaceClient,
}

impl ProfileLoader {
    pub fn new(client: MarketplaceClient) -> Self {
        Self { client }
    }

    /// Fetch the profile for `uid`, or `None` if it cannot be had.
    pub async fn load(&self, uid: &str) -> Option<UserProfile> {
        match self.client.get_user(uid).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(uid, error = %e, "Failed to fetch user profile");
                None
            }
        }
    }

    /// Push a newly registered user to the backend. `None` on failure.
    pub async fn sync(&self, request: &SyncUserRequest) -> Option<UserProfile> {
        match self.client.sync_user(request).await {
            Ok(profile) => {
                info!(uid = %request.firebase_uid, "User synced with backend");
                profile
            }
            Err(e) => {
                warn!(uid = %request.firebase_uid, error = %e, "Failed to sync user with backend");
                None
            }
        }
    }
}

/// What the account dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub display_name: String,
    pub user_type: UserType,
    pub company: String,
    pub country: String,
    pub member_since: DateTime<Utc>,
    pub plants_saved: usize,
    pub quotes_requested: usize,
}

impl DashboardView {
    /// Merge the profile (if any) over identity data. `now` stands in for
    /// an unknown registration date.
    pub fn build(identity: &Identity, profile: Option<&UserProfile>, now: DateTime<Utc>) -> Self {
        Self {
            display_name: present(profile.and_then(|p| p.name.as_deref()))
                .unwrap_or_else(|| identity.email.clone()),
            user_type: profile.map(|p| p.user_type).unwrap_or_default(),
            company: present(profile.and_then(|p| p.company.as_deref()))
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            country: present(profile.and_then(|p| p.country.as_deref()))
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            member_since: profile.and_then(|p| p.created_at).unwrap_or(now),
            plants_saved: profile.map_or(0, |p| p.plants_saved.len()),
            quotes_requested: profile.map_or(0, |p| p.quotes_requested.len()),
        }
    }

    pub fn greeting(&self) -> String {
        format!("👤 Welcome, {}", self.display_name)
    }
}

/// Empty strings count as missing.
fn present(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}
