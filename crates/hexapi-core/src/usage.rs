//! # Usage Module
//!
//! Data consumption for Airbus subscriptions.
//!
//! An account can hold several subscriptions. Only "limited" ones carry both
//! a consumed amount and a maximum; the first such subscription is the one
//! reported as the account's usage.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Error code reported when no subscription has a limit.
pub const NO_LIMITED_SUBSCRIPTIONS: &str = "no_limited_subscriptions";

/// Status code paired with [`NO_LIMITED_SUBSCRIPTIONS`].
pub const NO_LIMITED_SUBSCRIPTIONS_STATUS: u16 = 404;

/// One entry of `/api/v1/contracts/{id}/subscriptions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub amount_consumed: Option<f64>,
    #[serde(default)]
    pub amount_max: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The subscription listing document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPage {
    #[serde(default)]
    pub items: Vec<Subscription>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Consumed and maximum amount of one limited subscription.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataUsage {
    pub consumed: f64,
    pub max: f64,
}

impl DataUsage {
    /// First subscription with a non-zero consumed amount and maximum.
    pub fn first_limited(subscriptions: &[Subscription]) -> Option<Self> {
        subscriptions.iter().find_map(|sub| match (sub.amount_consumed, sub.amount_max) {
            (Some(consumed), Some(max)) if consumed != 0.0 && max != 0.0 => {
                Some(Self { consumed, max })
            }
            _ => None,
        })
    }

    /// Body reported when the account has no limited subscription.
    #[must_use]
    pub fn not_found_body() -> Value {
        json!({
            "error": NO_LIMITED_SUBSCRIPTIONS,
            "error_description": "There is no limited subscription for this user",
        })
    }
}
