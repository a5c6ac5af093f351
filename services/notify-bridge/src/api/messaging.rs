use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::api::{ApiJson, AppState, AuthenticatedSubject};
use crate::error::{BridgeError, BridgeResult};
use crate::platform::OutboundMessage;

const WELCOME_TEMPLATE: &str = "welcome-template";

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    pub recipient: Option<String>,
    pub template: Option<String>,
    pub data: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub message_id: String,
    pub status: &'static str,
}

/// Personalization for messages the caller sends to themselves.
#[derive(Debug, Deserialize)]
pub struct WelcomeBody {
    pub first_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DemoBody {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DemoResponse {
    pub message_id: String,
    pub status: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Sample notification kinds; anything unrecognized is `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DemoKind {
    OrderConfirmation,
    ShippingUpdate,
    General,
}

impl DemoKind {
    fn parse(kind: Option<&str>) -> Self {
        match kind {
            Some("order_confirmation") => Self::OrderConfirmation,
            Some("shipping_update") => Self::ShippingUpdate,
            _ => Self::General,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::OrderConfirmation => "order_confirmation",
            Self::ShippingUpdate => "shipping_update",
            Self::General => "general",
        }
    }

    const fn template(self) -> &'static str {
        match self {
            Self::OrderConfirmation => "order-confirmation-template",
            Self::ShippingUpdate => "shipping-update-template",
            Self::General => "general-notification-template",
        }
    }

    fn data(self, first_name: &str) -> Map<String, Value> {
        let now = Utc::now();
        let data = match self {
            Self::OrderConfirmation => json!({
                "first_name": first_name,
                "order_number": "DEMO-12345",
                "total_amount": "$99.99",
                "items": ["Demo Product 1", "Demo Product 2"],
            }),
            Self::ShippingUpdate => json!({
                "first_name": first_name,
                "tracking_number": "TRK-67890",
                "status": "Shipped",
                "estimated_delivery": (now + chrono::Duration::days(5)).format("%Y-%m-%d").to_string(),
            }),
            Self::General => json!({
                "first_name": first_name,
                "message": "This is a demo notification!",
                "timestamp": now.format("%Y-%m-%d %H:%M:%S").to_string(),
            }),
        };
        match data {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

pub(super) fn required<T>(value: Option<T>, field: &str) -> BridgeResult<T> {
    value.ok_or_else(|| BridgeError::validation(format!("Missing required field: {field}")))
}

fn display_name(first_name: Option<String>, subject: &str) -> String {
    first_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| subject.to_string())
}

pub async fn send_message(
    State(state): State<AppState>,
    AuthenticatedSubject(_caller): AuthenticatedSubject,
    ApiJson(body): ApiJson<SendMessageBody>,
) -> BridgeResult<Json<SendMessageResponse>> {
    let recipient = required(body.recipient, "recipient")?;
    let template = required(body.template, "template")?;
    let data = required(body.data, "data")?;

    let receipt = state
        .platform
        .send_message(&OutboundMessage::from_template(recipient, template, data))
        .await?;

    Ok(Json(SendMessageResponse {
        message_id: receipt.request_id,
        status: "sent",
    }))
}

pub async fn send_welcome(
    State(state): State<AppState>,
    AuthenticatedSubject(subject): AuthenticatedSubject,
    ApiJson(body): ApiJson<WelcomeBody>,
) -> BridgeResult<Json<SendMessageResponse>> {
    let mut data = Map::new();
    data.insert(
        "first_name".to_string(),
        Value::String(display_name(body.first_name, &subject)),
    );
    if let Some(email) = body.email {
        data.insert("email".to_string(), Value::String(email));
    }

    let receipt = state
        .platform
        .send_message(&OutboundMessage::from_template(subject, WELCOME_TEMPLATE, data))
        .await?;

    Ok(Json(SendMessageResponse {
        message_id: receipt.request_id,
        status: "sent",
    }))
}

pub async fn send_demo(
    State(state): State<AppState>,
    AuthenticatedSubject(subject): AuthenticatedSubject,
    ApiJson(body): ApiJson<DemoBody>,
) -> BridgeResult<Json<DemoResponse>> {
    let kind = DemoKind::parse(body.kind.as_deref());
    let data = kind.data(&display_name(body.first_name, &subject));

    let receipt = state
        .platform
        .send_message(&OutboundMessage::from_template(subject, kind.template(), data))
        .await?;

    Ok(Json(DemoResponse {
        message_id: receipt.request_id,
        status: "sent",
        kind: kind.as_str(),
    }))
}
