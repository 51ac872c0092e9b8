//! Item parameters as the host hands them over, and their conversion into a
//! validated [`AudienceOperation`].
//!
//! All validation happens here, before any network call is made.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::audience::operation::{
    AudienceFilter, AudienceOperation, CreateAudience, EstimateAudienceSize, SearchAudiences,
    UpdateAudience,
};
use crate::errors::{AgentError, Result};
use crate::utils::constants::{DEFAULT_SEARCH_LIMIT, DEFAULT_SEARCH_OFFSET, RESOURCE_AUDIENCE};

/// Raw parameter bag of one input item. Field names follow the host's
/// parameter names; everything is optional until the operation is known.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemParameters {
    #[serde(deserialize_with = "string_like")]
    pub resource: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub operation: Option<String>,

    // search
    #[serde(deserialize_with = "string_like")]
    pub audience_ids: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub advertiser_ids: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub audience_segment_ids: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub ad_set_ids: Option<String>,
    pub additional_fields: AdditionalFields,

    // create
    #[serde(deserialize_with = "string_like")]
    pub name: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub description: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub advertiser_id: Option<String>,
    pub algebra: Option<Value>,

    // update
    #[serde(deserialize_with = "string_like")]
    pub audience_id: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub update_name: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub update_description: Option<String>,
    pub update_algebra: Option<Value>,

    // delete / computeSize
    #[serde(deserialize_with = "string_like")]
    pub delete_audience_ids: Option<String>,
    #[serde(deserialize_with = "string_like")]
    pub compute_audience_ids: Option<String>,

    // estimateSize
    #[serde(deserialize_with = "string_like")]
    pub estimate_advertiser_id: Option<String>,
    pub estimate_algebra: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdditionalFields {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ItemParameters {
    pub fn from_value(parameters: &Value) -> Result<Self> {
        if !parameters.is_object() {
            return Err(AgentError::validation("item parameters must be a JSON object"));
        }
        ItemParameters::deserialize(parameters).map_err(|e| AgentError::validation(e.to_string()))
    }

    pub fn into_operation(self) -> Result<AudienceOperation> {
        let resource = self.resource.as_deref().unwrap_or(RESOURCE_AUDIENCE);
        if resource != RESOURCE_AUDIENCE {
            return Err(AgentError::validation(format!("unsupported resource '{}'", resource)));
        }

        let operation = self.operation.clone().unwrap_or_else(|| "search".to_owned());
        match operation.as_str() {
            "search" => self.into_search(),
            "create" => self.into_create(),
            "update" => self.into_update(),
            "delete" => {
                let ids = required_id_list("deleteAudienceIds", self.delete_audience_ids.as_deref())?;
                Ok(AudienceOperation::Delete(ids))
            }
            "computeSize" => {
                let ids = required_id_list("computeAudienceIds", self.compute_audience_ids.as_deref())?;
                Ok(AudienceOperation::ComputeSize(ids))
            }
            "estimateSize" => Ok(AudienceOperation::EstimateSize(EstimateAudienceSize {
                advertiser_id: required_id("estimateAdvertiserId", self.estimate_advertiser_id.as_deref())?,
                algebra: required_algebra("estimateAlgebra", self.estimate_algebra)?,
            })),
            other => Err(AgentError::validation(format!(
                "unsupported operation '{}' for resource '{}'",
                other, RESOURCE_AUDIENCE
            ))),
        }
    }

    fn into_search(self) -> Result<AudienceOperation> {
        let limit = match self.additional_fields.limit {
            None => DEFAULT_SEARCH_LIMIT,
            Some(limit) if limit >= 1 => limit as u64,
            Some(limit) => {
                return Err(AgentError::validation(format!("limit must be >= 1, got {}", limit)))
            }
        };
        let offset = match self.additional_fields.offset {
            None => DEFAULT_SEARCH_OFFSET,
            Some(offset) if offset >= 0 => offset as u64,
            Some(offset) => {
                return Err(AgentError::validation(format!("offset must be >= 0, got {}", offset)))
            }
        };

        Ok(AudienceOperation::Search(SearchAudiences {
            filter: AudienceFilter {
                audience_ids: optional_id_list(self.audience_ids.as_deref()),
                advertiser_ids: optional_id_list(self.advertiser_ids.as_deref()),
                audience_segment_ids: optional_id_list(self.audience_segment_ids.as_deref()),
                ad_set_ids: optional_id_list(self.ad_set_ids.as_deref()),
            },
            limit,
            offset,
        }))
    }

    fn into_create(self) -> Result<AudienceOperation> {
        Ok(AudienceOperation::Create(CreateAudience {
            name: required_text("name", self.name)?,
            description: self.description.unwrap_or_default(),
            advertiser_id: required_id("advertiserId", self.advertiser_id.as_deref())?,
            algebra: required_algebra("algebra", self.algebra)?,
        }))
    }

    fn into_update(self) -> Result<AudienceOperation> {
        Ok(AudienceOperation::Update(UpdateAudience {
            audience_id: required_id("audienceId", self.audience_id.as_deref())?,
            name: self.update_name.filter(|name| !name.is_empty()),
            description: self.update_description.filter(|text| !text.is_empty()),
            algebra: parse_algebra("updateAlgebra", self.update_algebra)?,
        }))
    }
}

/// Split a comma-separated id list, trimming tokens and dropping empty ones.
pub fn split_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect()
}

fn optional_id_list(raw: Option<&str>) -> Vec<String> {
    raw.map(split_id_list).unwrap_or_default()
}

fn required_id_list(field: &str, raw: Option<&str>) -> Result<Vec<String>> {
    let ids = optional_id_list(raw);
    if ids.is_empty() {
        return Err(AgentError::validation(format!(
            "{} must contain at least one audience id",
            field
        )));
    }
    Ok(ids)
}

fn required_id(field: &str, raw: Option<&str>) -> Result<String> {
    match raw {
        Some(id) if !id.trim().is_empty() => Ok(id.to_owned()),
        _ => Err(AgentError::validation(format!("{} is required", field))),
    }
}

fn required_text(field: &str, raw: Option<String>) -> Result<String> {
    raw.filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AgentError::validation(format!("{} is required", field)))
}

fn required_algebra(field: &str, raw: Option<Value>) -> Result<Value> {
    parse_algebra(field, raw)?
        .ok_or_else(|| AgentError::validation(format!("{} is required", field)))
}

/// Algebra arrives either as a JSON tree or as a string holding one.
/// Null and blank strings count as not provided.
fn parse_algebra(field: &str, raw: Option<Value>) -> Result<Option<Value>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| AgentError::validation(format!("{} is not valid JSON: {}", field, e))),
        Some(tree) => Ok(Some(tree)),
    }
}

/// Accepts strings and numbers (ids are often typed as numbers), null as absent.
fn string_like<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string, got {}",
            other
        ))),
    }
}
