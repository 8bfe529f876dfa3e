//! Public webhook URL construction.

use flowhook_config::WebhookConfig;
use flowhook_types::FlowId;

use crate::traits::WebhookUrls;

/// Path under the public URL where flow webhooks are served.
const WEBHOOK_PATH: &str = "v1/webhooks";

/// Suffix routing a webhook call to the flow's test run instead of a live run.
const SIMULATE_SUFFIX: &str = "/test";

/// Builds `{public_url}/v1/webhooks/{flow_id}[/test]`.
#[derive(Debug, Clone)]
pub struct WebhookUrlBuilder {
    prefix: String,
}

impl WebhookUrlBuilder {
    pub fn new(public_url: impl AsRef<str>) -> Self {
        let base = public_url.as_ref().trim_end_matches('/');
        Self {
            prefix: format!("{}/{}", base, WEBHOOK_PATH),
        }
    }

    pub fn from_config(config: &WebhookConfig) -> Self {
        Self::new(&config.public_url)
    }
}

impl Default for WebhookUrlBuilder {
    fn default() -> Self {
        Self::from_config(&WebhookConfig::default())
    }
}

impl WebhookUrls for WebhookUrlBuilder {
    fn webhook_url(&self, flow_id: &FlowId, simulate: bool) -> String {
        let suffix = if simulate { SIMULATE_SUFFIX } else { "" };
        format!("{}/{}{}", self.prefix, flow_id, suffix)
    }
}
