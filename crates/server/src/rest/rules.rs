use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Deserializer, Serialize};

use crate::auth::Principal;
use crate::rest::{ApiError, AppState};
use crate::service::CreateRuleInput;
use crate::store::{AlertRule, RulePatch};

/// Unknown keys, including `id`, `createdBy` and `enabled`, are ignored.
#[derive(Deserialize)]
pub struct CreateRuleRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(deserialize_with = "lenient_number")]
    pub threshold: f64,
    #[serde(default)]
    pub vehicles: Vec<String>,
    #[serde(default)]
    pub notifications: serde_json::Value,
}

/// Absent keys leave the stored field unchanged. There is no way to address
/// `id` or `createdBy` through this type.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRuleRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub rule_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_number")]
    pub threshold: Option<f64>,
    pub vehicles: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notifications: Option<serde_json::Value>,
    pub enabled: Option<bool>,
}

// Distinguishes `"notifications": null` (clear) from an absent key.
fn present<'de, D>(d: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(d).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        let n = match self {
            Self::Number(n) => n,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("threshold: not a number: {s:?}")))?,
        };
        if n.is_finite() {
            Ok(n)
        } else {
            Err(E::custom("threshold: must be finite"))
        }
    }
}

// Numeric strings such as "80" are cast to numbers, as clients already send them.
fn lenient_number<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrText::deserialize(d)?.into_f64()
}

fn lenient_optional_number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrText>::deserialize(d)?
        .map(NumberOrText::into_f64)
        .transpose()
}

/// A missing or blank body is an empty patch.
fn parse_update_body(body: &[u8]) -> Result<UpdateRuleRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(UpdateRuleRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        let status = if e.is_data() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::BAD_REQUEST
        };
        ApiError::new(status, format!("invalid request body: {e}"))
    })
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

impl From<CreateRuleRequest> for CreateRuleInput {
    fn from(body: CreateRuleRequest) -> Self {
        Self {
            name: body.name,
            rule_type: body.rule_type,
            threshold: body.threshold,
            vehicles: body.vehicles,
            notifications: body.notifications,
        }
    }
}

impl From<UpdateRuleRequest> for RulePatch {
    fn from(body: UpdateRuleRequest) -> Self {
        Self {
            name: body.name,
            rule_type: body.rule_type,
            threshold: body.threshold,
            vehicles: body.vehicles,
            notifications: body.notifications,
            enabled: body.enabled,
        }
    }
}

pub async fn list_rules(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<AlertRule>>, ApiError> {
    Ok(Json(state.rules.list(&principal).await?))
}

pub async fn get_rule(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(rule_id): Path<String>,
) -> Result<Json<AlertRule>, ApiError> {
    Ok(Json(state.rules.get(&principal, &rule_id).await?))
}

pub async fn create_rule(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Result<Json<CreateRuleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AlertRule>), ApiError> {
    let Json(body) = body?;
    let rule = state.rules.create(&principal, body.into()).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

pub async fn update_rule(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(rule_id): Path<String>,
    body: Bytes,
) -> Result<Json<AlertRule>, ApiError> {
    let body = parse_update_body(&body)?;
    Ok(Json(state.rules.update(&principal, &rule_id, body.into()).await?))
}

pub async fn delete_rule(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(rule_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.rules.delete(&principal, &rule_id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

pub async fn toggle_rule(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(rule_id): Path<String>,
) -> Result<Json<AlertRule>, ApiError> {
    Ok(Json(state.rules.toggle(&principal, &rule_id).await?))
}
