use serde::Deserialize;

/// Form payload posted by the SMS provider for a received text.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: String,
}
