use serde::{Deserialize, Serialize};

/// Gateway URL template with `{cid}` and `{file}` placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatewayTemplate(String);

impl GatewayTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        GatewayTemplate(template.into())
    }

    pub fn render(&self, cid: &str, file: &str) -> String {
        self.0.replace("{cid}", cid).replace("{file}", file)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Built-in gateways, tried in this order
pub fn default_gateways() -> Vec<GatewayTemplate> {
    [
        "https://{cid}.ipfs.w3s.link/{file}",
        "https://{cid}.ipfs.dweb.link/{file}",
        "https://ipfs.io/ipfs/{cid}/{file}",
        "https://gateway.pinata.cloud/ipfs/{cid}/{file}",
        "https://cloudflare-ipfs.com/ipfs/{cid}/{file}",
    ]
    .into_iter()
    .map(GatewayTemplate::new)
    .collect()
}
