//! Request and response records for the notification platform API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /auth/issue-token`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IssueTokenRequest {
    /// Space-joined scopes
    pub scope: String,
    /// Lifetime, e.g. `"30 days"`
    pub expires_in: String,
    /// Tenant the token is bound to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssuedToken {
    pub token: Option<String>,
}

/// Remote user profile.
///
/// Absent fields are omitted from the request rather than cleared.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Phone number for SMS channels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Locale, e.g. `en-US`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct ProfileEnvelope<'a> {
    pub profile: &'a UserProfile,
}

/// Message recipient.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Recipient {
    /// Remote-platform user id
    pub user_id: String,
}

/// Delivery routing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Routing {
    /// `all` delivers on every channel, `single` on the first that succeeds
    pub method: String,
    /// Channels in priority order
    pub channels: Vec<String>,
}

impl Default for Routing {
    fn default() -> Self {
        Self {
            method: "all".to_string(),
            channels: vec!["inbox".to_string(), "email".to_string()],
        }
    }
}

/// Message passed to `POST /send`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutboundMessage {
    /// Recipient
    pub to: Recipient,
    /// Platform template id
    pub template: String,
    /// Template variables
    pub data: Map<String, Value>,
    /// Delivery routing, inbox and email by default
    pub routing: Routing,
}

impl OutboundMessage {
    /// Message rendered from a platform template.
    #[must_use]
    pub fn from_template(
        user_id: impl Into<String>,
        template_id: impl Into<String>,
        data: Map<String, Value>,
    ) -> Self {
        Self {
            to: Recipient {
                user_id: user_id.into(),
            },
            template: template_id.into(),
            data,
            routing: Routing::default(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct MessageEnvelope<'a> {
    pub message: &'a OutboundMessage,
}

/// Response of `POST /send`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SendReceipt {
    /// Platform request id, used to trace delivery
    #[serde(rename = "requestId")]
    pub request_id: String,
}

/// Notification template as returned by the platform.
///
/// Only the identifying fields are typed; the rest is carried through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationTemplate {
    /// Template id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Template name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining platform fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Page of templates.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TemplateList {
    /// Templates on this page
    #[serde(default)]
    pub results: Vec<NotificationTemplate>,
}

/// Template create/update payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateDraft {
    /// Template name
    pub name: String,
    /// Email subject line
    pub subject: String,
    /// Content blocks, passed through unchanged
    pub blocks: Vec<Value>,
    /// Any other template fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `POST /templates`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TemplateCreated {
    /// Id of the new template
    #[serde(rename = "templateId", default)]
    pub template_id: Option<String>,
}

/// Brand as returned by the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Brand {
    /// Brand id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Brand name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining platform fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Page of brands.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BrandList {
    /// Brands on this page
    #[serde(default)]
    pub results: Vec<Brand>,
}

/// Brand create/update payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandDraft {
    /// Brand name
    pub name: String,
    /// Colors, logos and email layout
    #[serde(default)]
    pub settings: Value,
}
