//! Service status server functions.

use dioxus::prelude::*;
use tracker_core::Credits;

#[cfg(feature = "server")]
const CREDIT_BALANCE_URL: &str = "https://api.theirstack.com/v0/billing/credit-balance";

/// Billing balance as reported by TheirStack.
#[cfg(feature = "server")]
#[derive(Debug, Default, serde::Deserialize)]
struct CreditBalance {
    #[serde(default)]
    api_credits: i64,
    #[serde(default)]
    used_api_credits: i64,
}

#[cfg(feature = "server")]
impl From<CreditBalance> for Credits {
    fn from(balance: CreditBalance) -> Self {
        Credits::from_balance(balance.api_credits, balance.used_api_credits)
    }
}

/// Remaining credits of the upstream job-search API.
#[get("/api/v1/status/credits")]
pub async fn credits() -> Result<Credits, ServerFnError> {
    #[cfg(feature = "server")]
    {
        let config = crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {}", e)))?;

        let key = config
            .theirstack_api_key
            .as_deref()
            .ok_or_else(|| ServerFnError::new(format!("{} is not set", crate::THEIRSTACK_KEY_VAR)))?;

        let response = reqwest::Client::new()
            .get(CREDIT_BALANCE_URL)
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| ServerFnError::new(format!("Credits fetch failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Credits fetch failed: {} {}", status, body);
            return Err(ServerFnError::new(format!(
                "Credits fetch failed: {} {}",
                status, body
            )));
        }

        let balance: CreditBalance = response
            .json()
            .await
            .map_err(|e| ServerFnError::new(format!("Invalid credit balance: {}", e)))?;

        Ok(balance.into())
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}
