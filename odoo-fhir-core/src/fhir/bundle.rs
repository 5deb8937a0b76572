use serde::{Deserialize, Serialize};

use super::FhirResource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleType {
    Searchset,
    Collection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEntryMode {
    Match,
    Include,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleEntrySearch {
    pub mode: SearchEntryMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,
    pub resource: FhirResource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<BundleEntrySearch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(rename = "type")]
    pub bundle_type: BundleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    pub fn searchset() -> Self {
        Self {
            bundle_type: BundleType::Searchset,
            total: Some(0),
            entry: Vec::new(),
        }
    }

    /// Append a search match; `fullUrl` is the relative `Type/id` form.
    pub fn push_match(&mut self, resource: impl Into<FhirResource>) {
        let resource = resource.into();
        let full_url = resource
            .id()
            .map(|id| format!("{}/{}", resource.resource_type(), id));
        self.entry.push(BundleEntry {
            full_url,
            resource,
            search: Some(BundleEntrySearch {
                mode: SearchEntryMode::Match,
            }),
        });
        self.total = Some(self.entry.len());
    }

    pub fn len(&self) -> usize {
        self.entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_empty()
    }
}
