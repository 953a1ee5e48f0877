//! Client layer for the remote inventory store.
//!
//! The importer talks to the store exclusively through the `InventoryStore`
//! trait so that the reconciliation core can be exercised against an
//! in-memory implementation in tests. `HttpInventoryStore` is the real
//! backend.

mod http_store;
mod models;

#[cfg(test)]
pub mod test_store;

use thiserror::Error;

pub use http_store::HttpInventoryStore;
pub use models::{
    FactSheetHasParent, FactSheetHasRequires, NewResource, NewService, Resource, Service,
    ServiceHasResource, IMAGE_TAG, RESOURCE_TYPE_SOFTWARE,
};

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("inventory API request failed")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("inventory API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("no such entity: {0}")]
    NotFound(String),
}

/// Operations the importer needs from the inventory store.
///
/// Every call is one blocking network request against the real backend;
/// there is no caching or batching at this layer.
pub trait InventoryStore {
    /// Finds services whose name starts with the given filter.
    fn find_services(&self, name_filter: &str) -> Result<Vec<Service>, InventoryError>;

    fn create_service(&self, service: &NewService) -> Result<Service, InventoryError>;

    fn update_service(&self, id: &str, service: &NewService) -> Result<Service, InventoryError>;

    /// Finds resources whose name starts with the given filter.
    fn find_resources(&self, name_filter: &str) -> Result<Vec<Resource>, InventoryError>;

    /// Enumerates every resource in the workspace.
    fn list_resources(&self) -> Result<Vec<Resource>, InventoryError>;

    fn get_resource(&self, id: &str) -> Result<Resource, InventoryError>;

    fn create_resource(&self, resource: &NewResource) -> Result<Resource, InventoryError>;

    fn update_resource(&self, id: &str, resource: &NewResource)
        -> Result<Resource, InventoryError>;

    fn service_resources(
        &self,
        service_id: &str,
    ) -> Result<Vec<ServiceHasResource>, InventoryError>;

    fn create_service_resource(
        &self,
        service_id: &str,
        resource_id: &str,
    ) -> Result<ServiceHasResource, InventoryError>;

    fn delete_service_resource(
        &self,
        service_id: &str,
        relation_id: &str,
    ) -> Result<(), InventoryError>;

    fn resource_parents(
        &self,
        resource_id: &str,
    ) -> Result<Vec<FactSheetHasParent>, InventoryError>;

    fn create_resource_parent(
        &self,
        child_id: &str,
        parent_id: &str,
    ) -> Result<FactSheetHasParent, InventoryError>;

    fn delete_resource_parent(
        &self,
        resource_id: &str,
        relation_id: &str,
    ) -> Result<(), InventoryError>;

    fn resource_requires(
        &self,
        resource_id: &str,
    ) -> Result<Vec<FactSheetHasRequires>, InventoryError>;

    fn create_resource_requires(
        &self,
        resource_id: &str,
        required_id: &str,
    ) -> Result<FactSheetHasRequires, InventoryError>;

    fn delete_resource_requires(
        &self,
        resource_id: &str,
        relation_id: &str,
    ) -> Result<(), InventoryError>;
}
