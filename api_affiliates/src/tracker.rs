//! Client side of referral attribution.
//!
//! Storefront code that renders a page for a visitor hands the page URL to
//! [`ReferralTracker::track`]. When the URL carries `?ref=<code>` and the
//! visitor has no attribution cookie yet, the tracker calls the attribution
//! endpoint once and returns the `Set-Cookie` value to pass on.

use reqwest::{Client, header::SET_COOKIE};
use url::Url;

/// Query parameter that carries the referral code.
pub const REF_PARAM: &str = "ref";

#[derive(Debug, Clone)]
pub struct ReferralTracker {
    client: Client,
    endpoint: Url,
}

impl ReferralTracker {
    /// `endpoint` is the attribution route without the code,
    /// e.g. `https://shop.example/api/ref`.
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// The non-empty `ref` parameter of a page URL.
    pub fn referral_code(page: &Url) -> Option<String> {
        page.query_pairs()
            .find(|(key, _)| key == REF_PARAM)
            .map(|(_, value)| value.trim().to_string())
            .filter(|code| !code.is_empty())
    }

    fn attribution_url(&self, code: &str) -> Option<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut().ok()?.pop_if_empty().push(code);
        Some(url)
    }

    /// Reports a page view. Returns the cookie to set, if one was issued.
    ///
    /// Never fails: network and server errors are logged at debug level and
    /// the page renders as if no referral was present.
    pub async fn track(&self, page: &Url, has_attribution_cookie: bool) -> Option<String> {
        if has_attribution_cookie {
            return None;
        }
        let code = Self::referral_code(page)?;
        let url = self.attribution_url(&code)?;

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::debug!("Referral tracking for {} failed: {}", code, e);
                return None;
            }
        };
        if !response.status().is_success() {
            log::debug!(
                "Referral tracking for {} answered {}",
                code,
                response.status()
            );
            return None;
        }

        response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }
}
