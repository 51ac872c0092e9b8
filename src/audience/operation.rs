use http::Method;
use serde_json::Value;

use crate::audience::payload::{
    AudiencePayload, CreateAttributes, Document, EstimateAttributes, ResourceObject,
    SearchAttributes, UpdateAttributes, ValuePatch, TYPE_AUDIENCE, TYPE_AUDIENCE_SEARCH,
};
use crate::utils::constants::{
    AUDIENCES_COMPUTE_SIZES_ENDPOINT, AUDIENCES_CREATE_ENDPOINT, AUDIENCES_DELETE_ENDPOINT,
    AUDIENCES_ENDPOINT, AUDIENCES_ESTIMATE_SIZE_ENDPOINT, AUDIENCES_SEARCH_ENDPOINT,
};

/// One validated audience operation with its own field set
#[derive(Debug, Clone, PartialEq)]
pub enum AudienceOperation {
    Search(SearchAudiences),
    Create(CreateAudience),
    Update(UpdateAudience),
    /// non-empty list of audience ids
    Delete(Vec<String>),
    /// non-empty list of audience ids
    ComputeSize(Vec<String>),
    EstimateSize(EstimateAudienceSize),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudienceFilter {
    pub audience_ids: Vec<String>,
    pub advertiser_ids: Vec<String>,
    pub audience_segment_ids: Vec<String>,
    pub ad_set_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchAudiences {
    pub filter: AudienceFilter,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateAudience {
    pub name: String,
    pub description: String,
    pub advertiser_id: String,
    pub algebra: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAudience {
    pub audience_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub algebra: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EstimateAudienceSize {
    pub advertiser_id: String,
    pub algebra: Value,
}

impl AudienceOperation {
    /// Operation name as used in item parameters
    pub fn name(&self) -> &'static str {
        match self {
            AudienceOperation::Search(_) => "search",
            AudienceOperation::Create(_) => "create",
            AudienceOperation::Update(_) => "update",
            AudienceOperation::Delete(_) => "delete",
            AudienceOperation::ComputeSize(_) => "computeSize",
            AudienceOperation::EstimateSize(_) => "estimateSize",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            AudienceOperation::Update(_) => Method::PATCH,
            _ => Method::POST,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            AudienceOperation::Search(_) => AUDIENCES_SEARCH_ENDPOINT,
            AudienceOperation::Create(_) => AUDIENCES_CREATE_ENDPOINT,
            AudienceOperation::Update(_) => AUDIENCES_ENDPOINT,
            AudienceOperation::Delete(_) => AUDIENCES_DELETE_ENDPOINT,
            AudienceOperation::ComputeSize(_) => AUDIENCES_COMPUTE_SIZES_ENDPOINT,
            AudienceOperation::EstimateSize(_) => AUDIENCES_ESTIMATE_SIZE_ENDPOINT,
        }
    }

    /// Only search is paged
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            AudienceOperation::Search(search) => vec![
                ("limit", search.limit.to_string()),
                ("offset", search.offset.to_string()),
            ],
            _ => Vec::new(),
        }
    }

    pub fn payload(&self) -> AudiencePayload {
        match self {
            AudienceOperation::Search(search) => AudiencePayload::Search(Document {
                data: ResourceObject {
                    id: None,
                    kind: TYPE_AUDIENCE_SEARCH,
                    attributes: search.filter.to_attributes(),
                },
            }),
            AudienceOperation::Create(create) => AudiencePayload::Create(Document {
                data: vec![ResourceObject {
                    id: None,
                    kind: TYPE_AUDIENCE,
                    attributes: CreateAttributes {
                        name: create.name.clone(),
                        description: create.description.clone(),
                        advertiser_id: create.advertiser_id.clone(),
                        algebra: create.algebra.clone(),
                    },
                }],
            }),
            AudienceOperation::Update(update) => AudiencePayload::Update(Document {
                data: vec![ResourceObject {
                    id: Some(update.audience_id.clone()),
                    kind: TYPE_AUDIENCE,
                    attributes: UpdateAttributes {
                        name: update.name.clone(),
                        description: update
                            .description
                            .clone()
                            .map(|value| ValuePatch { value }),
                        algebra: update.algebra.clone(),
                    },
                }],
            }),
            AudienceOperation::Delete(ids) | AudienceOperation::ComputeSize(ids) => {
                AudiencePayload::identifiers(ids)
            }
            AudienceOperation::EstimateSize(estimate) => AudiencePayload::Estimate(Document {
                data: ResourceObject {
                    id: None,
                    kind: TYPE_AUDIENCE,
                    attributes: EstimateAttributes {
                        advertiser_id: estimate.advertiser_id.clone(),
                        algebra: estimate.algebra.clone(),
                    },
                },
            }),
        }
    }
}

impl AudienceFilter {
    /// Empty lists are dropped so they never reach the wire.
    pub fn to_attributes(&self) -> SearchAttributes {
        fn non_empty(ids: &[String]) -> Option<Vec<String>> {
            (!ids.is_empty()).then(|| ids.to_vec())
        }
        SearchAttributes {
            audience_ids: non_empty(&self.audience_ids),
            advertiser_ids: non_empty(&self.advertiser_ids),
            audience_segment_ids: non_empty(&self.audience_segment_ids),
            ad_set_ids: non_empty(&self.ad_set_ids),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(op: &AudienceOperation) -> Value {
        serde_json::to_value(op.payload()).unwrap()
    }

    fn algebra() -> Value {
        json!({"and": [
            {"or": [{"audienceSegmentId": "42914"}, {"audienceSegmentId": "19234"}]},
            {"not": {"audienceSegmentId": "3482"}}
        ]})
    }

    #[test]
    fn search_without_filters_sends_empty_attributes() {
        let op = AudienceOperation::Search(SearchAudiences {
            filter: AudienceFilter::default(),
            limit: 50,
            offset: 0,
        });
        assert_eq!(op.method(), Method::POST);
        assert_eq!(op.endpoint(), "/marketing-solutions/audiences/search");
        assert_eq!(op.query(), vec![("limit", "50".to_owned()), ("offset", "0".to_owned())]);
        assert_eq!(wire(&op), json!({"data": {"type": "AudienceSearch", "attributes": {}}}));
    }

    #[test]
    fn search_sends_only_non_empty_filters() {
        let op = AudienceOperation::Search(SearchAudiences {
            filter: AudienceFilter {
                audience_ids: vec!["1001".into(), "1002".into(), "1003".into()],
                ad_set_ids: vec!["7".into()],
                ..AudienceFilter::default()
            },
            limit: 5,
            offset: 10,
        });
        assert_eq!(
            wire(&op),
            json!({"data": {"type": "AudienceSearch", "attributes": {
                "audienceIds": ["1001", "1002", "1003"],
                "adSetIds": ["7"]
            }}})
        );
    }

    #[test]
    fn create_keeps_bare_description_even_when_empty() {
        let op = AudienceOperation::Create(CreateAudience {
            name: "Cart abandoners".into(),
            description: String::new(),
            advertiser_id: "4949".into(),
            algebra: algebra(),
        });
        assert_eq!(op.endpoint(), "/marketing-solutions/audiences/create");
        assert!(op.query().is_empty());
        assert_eq!(
            wire(&op),
            json!({"data": [{"type": "Audience", "attributes": {
                "name": "Cart abandoners",
                "description": "",
                "advertiserId": "4949",
                "algebra": algebra()
            }}]})
        );
    }

    #[test]
    fn update_wraps_description_and_omits_missing_fields() {
        let op = AudienceOperation::Update(UpdateAudience {
            audience_id: "77".into(),
            name: None,
            description: Some("new text".into()),
            algebra: None,
        });
        assert_eq!(op.method(), Method::PATCH);
        assert_eq!(op.endpoint(), "/marketing-solutions/audiences");
        assert_eq!(
            wire(&op),
            json!({"data": [{"id": "77", "type": "Audience", "attributes": {
                "description": {"value": "new text"}
            }}]})
        );
    }

    #[test]
    fn delete_and_compute_size_send_identifiers() {
        let ids = vec!["1".to_owned(), "2".to_owned()];
        let expected = json!({"data": [{"id": "1", "type": "Audience"}, {"id": "2", "type": "Audience"}]});

        let delete = AudienceOperation::Delete(ids.clone());
        assert_eq!(delete.endpoint(), "/marketing-solutions/audiences/delete");
        assert_eq!(wire(&delete), expected);

        let compute = AudienceOperation::ComputeSize(ids);
        assert_eq!(compute.endpoint(), "/marketing-solutions/audiences/compute-sizes");
        assert_eq!(wire(&compute), expected);
    }

    #[test]
    fn estimate_size_sends_single_resource() {
        let op = AudienceOperation::EstimateSize(EstimateAudienceSize {
            advertiser_id: "4949".into(),
            algebra: algebra(),
        });
        assert_eq!(op.endpoint(), "/marketing-solutions/audiences/estimate-size");
        assert_eq!(
            wire(&op),
            json!({"data": {"type": "Audience", "attributes": {
                "advertiserId": "4949",
                "algebra": algebra()
            }}})
        );
    }
}
