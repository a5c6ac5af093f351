//! Notification platform HTTP client.
//!
//! Each operation is exactly one request: no batching, retry or caching.

use bridge_common::build_http_client;
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::PlatformConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::metrics;
use crate::platform::models::{
    Brand, BrandDraft, BrandList, IssueTokenRequest, IssuedToken, MessageEnvelope,
    NotificationTemplate, OutboundMessage, ProfileEnvelope, SendReceipt, TemplateCreated,
    TemplateDraft, TemplateList, UserProfile,
};

/// Client for the notification platform REST API.
pub struct PlatformClient {
    http: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    tenant_id: Option<String>,
}

impl PlatformClient {
    /// Create a new platform client.
    ///
    /// A missing API key or tenant is not an error here; operations that need
    /// them fail instead.
    ///
    /// # Errors
    ///
    /// `Configuration` if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &PlatformConfig) -> BridgeResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BridgeError::configuration(format!("Invalid platform URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BridgeError::configuration(format!(
                "Invalid platform URL: {}",
                config.base_url
            )));
        }
        let http = build_http_client(&config.http)
            .map_err(|e| BridgeError::configuration(format!("HTTP client: {e}")))?;

        if config.api_key.is_none() {
            warn!("COURIER_API_KEY not configured; platform operations will fail");
        }

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            tenant_id: config.tenant_id.clone(),
        })
    }

    /// Configured tenant id.
    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    /// Whether an API key is configured.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    /// Request a widget token from the platform.
    ///
    /// # Errors
    ///
    /// `Configuration` without an API key (no request is sent), `Upstream`
    /// on a non-success status or a body without `token`.
    #[instrument(skip(self, request))]
    pub async fn issue_token(&self, request: &IssueTokenRequest) -> BridgeResult<String> {
        let builder = self.prepare(Method::POST, &["auth", "issue-token"])?.json(request);
        let (status, issued): (u16, IssuedToken) =
            self.execute_with_status("issue_token", builder).await?;

        issued
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BridgeError::upstream(Some(status), "response missing token field"))
    }

    /// Create or replace the profile of `user_id`.
    ///
    /// # Errors
    ///
    /// `Configuration` without an API key, `Upstream` on failure.
    #[instrument(skip(self, profile))]
    pub async fn replace_profile(&self, user_id: &str, profile: &UserProfile) -> BridgeResult<()> {
        let builder = self
            .prepare(Method::PUT, &["profiles", user_id])?
            .json(&ProfileEnvelope { profile });
        self.execute_unit("replace_profile", builder).await?;
        info!(user_id, "Replaced platform profile");
        Ok(())
    }

    /// Send a message.
    ///
    /// # Errors
    ///
    /// `Configuration` without an API key, `Upstream` on failure.
    #[instrument(skip(self, message), fields(user_id = %message.to.user_id))]
    pub async fn send_message(&self, message: &OutboundMessage) -> BridgeResult<SendReceipt> {
        let builder = self
            .prepare(Method::POST, &["send"])?
            .json(&MessageEnvelope { message });
        let receipt: SendReceipt = self.execute("send_message", builder).await?;
        info!(request_id = %receipt.request_id, "Sent message");
        Ok(receipt)
    }

    /// List templates of the configured tenant.
    ///
    /// # Errors
    ///
    /// `Configuration` without an API key or tenant, `Upstream` on failure.
    pub async fn list_templates(&self) -> BridgeResult<TemplateList> {
        let tenant = self.tenant()?;
        let builder = self.prepare(Method::GET, &["tenants", tenant, "templates"])?;
        self.execute("list_templates", builder).await
    }

    /// Fetch one template of the configured tenant.
    ///
    /// # Errors
    ///
    /// `Configuration` without an API key or tenant, `Upstream` on failure.
    pub async fn get_template(&self, template_id: &str) -> BridgeResult<NotificationTemplate> {
        let tenant = self.tenant()?;
        let builder =
            self.prepare(Method::GET, &["tenants", tenant, "templates", template_id])?;
        self.execute("get_template", builder).await
    }

    /// Create a template.
    ///
    /// # Errors
    ///
    /// `Configuration` without an API key, `Upstream` on failure.
    pub async fn create_template(&self, draft: &TemplateDraft) -> BridgeResult<TemplateCreated> {
        let builder = self.prepare(Method::POST, &["templates"])?.json(draft);
        self.execute("create_template", builder).await
    }

    /// Replace a template.
    ///
    /// # Errors
    ///
    /// `Configuration` without an API key, `Upstream` on failure.
    pub async fn update_template(&self, template_id: &str, draft: &TemplateDraft) -> BridgeResult<()> {
        let builder = self
            .prepare(Method::PUT, &["templates", template_id])?
            .json(draft);
        self.execute_unit("update_template", builder).await
    }

    /// Delete a template.
    ///
    /// # Errors
    ///
    /// `Configuration` without an API key, `Upstream` on failure.
    pub async fn delete_template(&self, template_id: &str) -> BridgeResult<()> {
        let builder = self.prepare(Method::DELETE, &["templates", template_id])?;
        self.execute_unit("delete_template", builder).await
    }

    /// List brands.
    ///
    /// # Errors
    ///
    /// `Configuration` without an API key, `Upstream` on failure.
    pub async fn list_brands(&self) -> BridgeResult<BrandList> {
        let builder = self.prepare(Method::GET, &["brands"])?;
        self.execute("list_brands", builder).await
    }

    /// Fetch one brand.
    ///
    /// # Errors
    ///
    /// `Configuration` without an API key, `Upstream` on failure.
    pub async fn get_brand(&self, brand_id: &str) -> BridgeResult<Brand> {
        let builder = self.prepare(Method::GET, &["brands", brand_id])?;
        self.execute("get_brand", builder).await
    }

    /// Create a brand.
    ///
    /// # Errors
    ///
    /// `Configuration` without an API key, `Upstream` on failure.
    pub async fn create_brand(&self, draft: &BrandDraft) -> BridgeResult<Brand> {
        let builder = self.prepare(Method::POST, &["brands"])?.json(draft);
        self.execute("create_brand", builder).await
    }

    /// Replace a brand.
    ///
    /// # Errors
    ///
    /// `Configuration` without an API key, `Upstream` on failure.
    pub async fn update_brand(&self, brand_id: &str, draft: &BrandDraft) -> BridgeResult<Brand> {
        let builder = self.prepare(Method::PUT, &["brands", brand_id])?.json(draft);
        self.execute("update_brand", builder).await
    }

    /// Delete a brand.
    ///
    /// # Errors
    ///
    /// `Configuration` without an API key, `Upstream` on failure.
    pub async fn delete_brand(&self, brand_id: &str) -> BridgeResult<()> {
        let builder = self.prepare(Method::DELETE, &["brands", brand_id])?;
        self.execute_unit("delete_brand", builder).await
    }

    fn tenant(&self) -> BridgeResult<&str> {
        self.tenant_id
            .as_deref()
            .ok_or_else(|| BridgeError::configuration("COURIER_TENANT_ID not configured"))
    }

    /// Build an authorized request; fails before any I/O without an API key.
    fn prepare(&self, method: Method, segments: &[&str]) -> BridgeResult<RequestBuilder> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| BridgeError::configuration("COURIER_API_KEY not configured"))?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BridgeError::configuration("Invalid platform URL"))?
            .pop_if_empty()
            .extend(segments);

        debug!(%method, path = url.path(), "Platform request");
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(api_key.expose_secret()))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> BridgeResult<T> {
        self.execute_with_status(operation, builder)
            .await
            .map(|(_, value)| value)
    }

    async fn execute_with_status<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> BridgeResult<(u16, T)> {
        let response = self.dispatch(operation, builder).await?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            metrics::record_platform_request(operation, "transport_error");
            BridgeError::upstream(Some(status), e.to_string())
        })?;

        let value = serde_json::from_slice(&body).map_err(|e| {
            warn!(operation, error = %e, "Malformed platform response");
            metrics::record_platform_request(operation, "malformed_body");
            BridgeError::upstream(Some(status), format!("malformed response body: {e}"))
        })?;
        Ok((status, value))
    }

    async fn execute_unit(&self, operation: &'static str, builder: RequestBuilder) -> BridgeResult<()> {
        self.dispatch(operation, builder).await.map(|_| ())
    }

    async fn dispatch(&self, operation: &'static str, builder: RequestBuilder) -> BridgeResult<Response> {
        let response = builder.send().await.map_err(|e| {
            error!(operation, error = %e, "Platform request failed");
            metrics::record_platform_request(operation, "transport_error");
            BridgeError::upstream(None, e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(operation, status = status.as_u16(), "Platform returned error status");
            metrics::record_platform_request(operation, "http_error");
            return Err(BridgeError::upstream(Some(status.as_u16()), text));
        }

        metrics::record_platform_request(operation, "success");
        Ok(response)
    }
}
