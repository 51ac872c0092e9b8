use serde::Serialize;
use serde_json::Value;

pub const TYPE_AUDIENCE: &str = "Audience";
pub const TYPE_AUDIENCE_SEARCH: &str = "AudienceSearch";

/// Top-level JSON:API document
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Document<T> {
    pub data: T,
}

/// Resource with attributes; `id` is only present for updates
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourceObject<A> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: A,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourceIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Search filter; absent lists are left out of the body entirely
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertiser_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_segment_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_set_ids: Option<Vec<String>>,
}

/// `description` is a bare string here, even when empty
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttributes {
    pub name: String,
    pub description: String,
    pub advertiser_id: String,
    pub algebra: Value,
}

/// Partial update: only provided attributes are sent
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValuePatch<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algebra: Option<Value>,
}

/// `{ "value": ... }` wrapper meaning "set this attribute to value"
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValuePatch<T> {
    pub value: T,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstimateAttributes {
    pub advertiser_id: String,
    pub algebra: Value,
}

/// Request body of each audience operation
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum AudiencePayload {
    Search(Document<ResourceObject<SearchAttributes>>),
    Create(Document<Vec<ResourceObject<CreateAttributes>>>),
    Update(Document<Vec<ResourceObject<UpdateAttributes>>>),
    Identifiers(Document<Vec<ResourceIdentifier>>),
    Estimate(Document<ResourceObject<EstimateAttributes>>),
}

impl AudiencePayload {
    pub fn identifiers(ids: &[String]) -> Self {
        AudiencePayload::Identifiers(Document {
            data: ids
                .iter()
                .map(|id| ResourceIdentifier { id: id.to_owned(), kind: TYPE_AUDIENCE })
                .collect(),
        })
    }
}
