//! Notification platform HTTP client.
//!
//! The platform client is the only I/O boundary to the remote platform.

pub mod client;
pub mod models;

pub use client::PlatformClient;
pub use models::{
    Brand, BrandDraft, BrandList, IssueTokenRequest, NotificationTemplate,
    OutboundMessage, Recipient, Routing, SendReceipt, TemplateCreated, TemplateDraft,
    TemplateList, UserProfile,
};
