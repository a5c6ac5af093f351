use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::messaging::required;
use crate::api::{ApiJson, AppState, AuthenticatedSubject};
use crate::error::BridgeResult;
use crate::platform::{Brand, NotificationTemplate, TemplateDraft};

#[derive(Debug, Deserialize)]
pub struct TemplateBody {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub blocks: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TemplateBody {
    fn into_draft(self) -> BridgeResult<TemplateDraft> {
        Ok(TemplateDraft {
            name: required(self.name, "name")?,
            subject: required(self.subject, "subject")?,
            blocks: required(self.blocks, "blocks")?,
            extra: self.extra,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<NotificationTemplate>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub template: NotificationTemplate,
}

#[derive(Debug, Serialize)]
pub struct TemplateStatus {
    pub template_id: Option<String>,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BrandsResponse {
    pub brands: Vec<Brand>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct BrandResponse {
    pub brand: Brand,
}

pub async fn list_templates(
    State(state): State<AppState>,
    _caller: AuthenticatedSubject,
) -> BridgeResult<Json<TemplatesResponse>> {
    let templates = state.platform.list_templates().await?.results;
    Ok(Json(TemplatesResponse {
        count: templates.len(),
        templates,
    }))
}

pub async fn get_template(
    State(state): State<AppState>,
    _caller: AuthenticatedSubject,
    Path(template_id): Path<String>,
) -> BridgeResult<Json<TemplateResponse>> {
    let template = state.platform.get_template(&template_id).await?;
    Ok(Json(TemplateResponse { template }))
}

pub async fn create_template(
    State(state): State<AppState>,
    _caller: AuthenticatedSubject,
    ApiJson(body): ApiJson<TemplateBody>,
) -> BridgeResult<(StatusCode, Json<TemplateStatus>)> {
    let draft = body.into_draft()?;
    let created = state.platform.create_template(&draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(TemplateStatus {
            template_id: created.template_id,
            status: "created",
        }),
    ))
}

pub async fn update_template(
    State(state): State<AppState>,
    _caller: AuthenticatedSubject,
    Path(template_id): Path<String>,
    ApiJson(body): ApiJson<TemplateBody>,
) -> BridgeResult<Json<TemplateStatus>> {
    let draft = body.into_draft()?;
    state.platform.update_template(&template_id, &draft).await?;
    Ok(Json(TemplateStatus {
        template_id: Some(template_id),
        status: "updated",
    }))
}

pub async fn delete_template(
    State(state): State<AppState>,
    _caller: AuthenticatedSubject,
    Path(template_id): Path<String>,
) -> BridgeResult<Json<TemplateStatus>> {
    state.platform.delete_template(&template_id).await?;
    Ok(Json(TemplateStatus {
        template_id: Some(template_id),
        status: "deleted",
    }))
}

pub async fn list_brands(
    State(state): State<AppState>,
    _caller: AuthenticatedSubject,
) -> BridgeResult<Json<BrandsResponse>> {
    let brands = state.platform.list_brands().await?.results;
    Ok(Json(BrandsResponse {
        count: brands.len(),
        brands,
    }))
}

pub async fn get_brand(
    State(state): State<AppState>,
    _caller: AuthenticatedSubject,
    Path(brand_id): Path<String>,
) -> BridgeResult<Json<BrandResponse>> {
    let brand = state.platform.get_brand(&brand_id).await?;
    Ok(Json(BrandResponse { brand }))
}
