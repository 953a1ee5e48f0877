//! Wire types for the remote inventory API.
//!
//! Entities come in two flavors: a draft type (`NewService`, `NewResource`)
//! holding everything a client may set, and a persisted type carrying the
//! server-assigned ID plus server-computed fields. Relations follow the same
//! split.

use serde::{Deserialize, Serialize};

/// Resource type assigned to every entity this importer creates.
pub const RESOURCE_TYPE_SOFTWARE: &str = "SOFTWARE";

/// Tag that marks a resource as a container image rather than an
/// application component.
pub const IMAGE_TAG: &str = "image";

/// A service entity as returned by the inventory API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// Payload for creating or updating a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub name: String,
    pub description: String,
}

/// A resource entity as returned by the inventory API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub resource_type: String,

    #[serde(default)]
    pub release: String,

    /// Computed by the server; starts out equal to `name` and picks up the
    /// parent's name once a hierarchy relation exists.
    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload for creating or updating a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    pub name: String,
    pub description: String,
    pub resource_type: String,
    pub release: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl From<&Resource> for NewResource {
    fn from(resource: &Resource) -> Self {
        NewResource {
            name: resource.name.clone(),
            description: resource.description.clone(),
            resource_type: resource.resource_type.clone(),
            release: resource.release.clone(),
            tags: resource.tags.clone(),
        }
    }
}

/// Membership relation between a service and one of its top-level resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHasResource {
    pub id: String,
    pub service_id: String,
    pub resource_id: String,
}

/// Hierarchy relation from a child resource to its parent resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactSheetHasParent {
    pub id: String,
    pub fact_sheet_id: String,
    pub fact_sheet_ref_id: String,
}

/// Dependency relation between two resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactSheetHasRequires {
    pub id: String,
    pub fact_sheet_id: String,
    pub fact_sheet_ref_id: String,
}
