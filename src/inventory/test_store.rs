//! In-memory implementation of the inventory store for tests.
//!
//! Models the server behaviors the importer depends on: ID assignment on
//! create, prefix matching for name filters, and display-name propagation
//! once a hierarchy relation exists.

use std::cell::RefCell;

use super::{
    FactSheetHasParent, FactSheetHasRequires, InventoryError, InventoryStore, NewResource,
    NewService, Resource, Service, ServiceHasResource,
};

#[derive(Default)]
pub struct InMemoryInventory {
    inner: RefCell<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    services: Vec<Service>,
    resources: Vec<Resource>,
    memberships: Vec<ServiceHasResource>,
    parents: Vec<FactSheetHasParent>,
    requires: Vec<FactSheetHasRequires>,
}

impl Inner {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

impl InMemoryInventory {
    pub fn new() -> InMemoryInventory {
        InMemoryInventory::default()
    }

    pub fn service_count(&self) -> usize {
        self.inner.borrow().services.len()
    }

    pub fn resource_count(&self) -> usize {
        self.inner.borrow().resources.len()
    }

    pub fn resource_named(&self, name: &str, release: &str) -> Option<Resource> {
        self.inner
            .borrow()
            .resources
            .iter()
            .find(|resource| resource.name == name && resource.release == release)
            .cloned()
    }

    /// Names of all resources directly attached to the given service,
    /// sorted for stable comparisons.
    pub fn membership_names(&self, service_id: &str) -> Vec<String> {
        let inner = self.inner.borrow();
        let mut names: Vec<String> = inner
            .memberships
            .iter()
            .filter(|relation| relation.service_id == service_id)
            .map(|relation| resource_name(&inner, &relation.resource_id))
            .collect();
        names.sort();
        names
    }

    /// Names of all resources the given resource requires, sorted.
    pub fn requires_names(&self, resource_id: &str) -> Vec<String> {
        let inner = self.inner.borrow();
        let mut names: Vec<String> = inner
            .requires
            .iter()
            .filter(|relation| relation.fact_sheet_id == resource_id)
            .map(|relation| resource_name(&inner, &relation.fact_sheet_ref_id))
            .collect();
        names.sort();
        names
    }

    /// Names of all parents of the given resource.
    pub fn parent_names(&self, resource_id: &str) -> Vec<String> {
        let inner = self.inner.borrow();
        let mut names: Vec<String> = inner
            .parents
            .iter()
            .filter(|relation| relation.fact_sheet_id == resource_id)
            .map(|relation| resource_name(&inner, &relation.fact_sheet_ref_id))
            .collect();
        names.sort();
        names
    }

    pub fn parent_relation_count(&self) -> usize {
        self.inner.borrow().parents.len()
    }
}

fn resource_name(inner: &Inner, id: &str) -> String {
    inner
        .resources
        .iter()
        .find(|resource| resource.id == id)
        .map(|resource| resource.name.clone())
        .unwrap_or_else(|| format!("<unknown {}>", id))
}

impl InventoryStore for InMemoryInventory {
    fn find_services(&self, name_filter: &str) -> Result<Vec<Service>, InventoryError> {
        Ok(self
            .inner
            .borrow()
            .services
            .iter()
            .filter(|service| service.name.starts_with(name_filter))
            .cloned()
            .collect())
    }

    fn create_service(&self, service: &NewService) -> Result<Service, InventoryError> {
        let mut inner = self.inner.borrow_mut();
        let created = Service {
            id: inner.next_id("svc"),
            name: service.name.clone(),
            description: service.description.clone(),
        };
        inner.services.push(created.clone());
        Ok(created)
    }

    fn update_service(&self, id: &str, service: &NewService) -> Result<Service, InventoryError> {
        let mut inner = self.inner.borrow_mut();
        let existing = inner
            .services
            .iter_mut()
            .find(|service| service.id == id)
            .ok_or_else(|| InventoryError::NotFound(id.to_owned()))?;

        existing.name = service.name.clone();
        existing.description = service.description.clone();
        Ok(existing.clone())
    }

    fn find_resources(&self, name_filter: &str) -> Result<Vec<Resource>, InventoryError> {
        Ok(self
            .inner
            .borrow()
            .resources
            .iter()
            .filter(|resource| resource.name.starts_with(name_filter))
            .cloned()
            .collect())
    }

    fn list_resources(&self) -> Result<Vec<Resource>, InventoryError> {
        Ok(self.inner.borrow().resources.clone())
    }

    fn get_resource(&self, id: &str) -> Result<Resource, InventoryError> {
        self.inner
            .borrow()
            .resources
            .iter()
            .find(|resource| resource.id == id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(id.to_owned()))
    }

    fn create_resource(&self, resource: &NewResource) -> Result<Resource, InventoryError> {
        let mut inner = self.inner.borrow_mut();
        let created = Resource {
            id: inner.next_id("res"),
            name: resource.name.clone(),
            description: resource.description.clone(),
            resource_type: resource.resource_type.clone(),
            release: resource.release.clone(),
            display_name: resource.name.clone(),
            tags: resource.tags.clone(),
        };
        inner.resources.push(created.clone());
        Ok(created)
    }

    fn update_resource(
        &self,
        id: &str,
        resource: &NewResource,
    ) -> Result<Resource, InventoryError> {
        let mut inner = self.inner.borrow_mut();
        let existing = inner
            .resources
            .iter_mut()
            .find(|resource| resource.id == id)
            .ok_or_else(|| InventoryError::NotFound(id.to_owned()))?;

        existing.name = resource.name.clone();
        existing.description = resource.description.clone();
        existing.resource_type = resource.resource_type.clone();
        existing.release = resource.release.clone();
        existing.tags = resource.tags.clone();
        Ok(existing.clone())
    }

    fn service_resources(
        &self,
        service_id: &str,
    ) -> Result<Vec<ServiceHasResource>, InventoryError> {
        Ok(self
            .inner
            .borrow()
            .memberships
            .iter()
            .filter(|relation| relation.service_id == service_id)
            .cloned()
            .collect())
    }

    fn create_service_resource(
        &self,
        service_id: &str,
        resource_id: &str,
    ) -> Result<ServiceHasResource, InventoryError> {
        let mut inner = self.inner.borrow_mut();
        let relation = ServiceHasResource {
            id: inner.next_id("rel"),
            service_id: service_id.to_owned(),
            resource_id: resource_id.to_owned(),
        };
        inner.memberships.push(relation.clone());
        Ok(relation)
    }

    fn delete_service_resource(
        &self,
        service_id: &str,
        relation_id: &str,
    ) -> Result<(), InventoryError> {
        let mut inner = self.inner.borrow_mut();
        let index = inner
            .memberships
            .iter()
            .position(|relation| relation.id == relation_id && relation.service_id == service_id)
            .ok_or_else(|| InventoryError::NotFound(relation_id.to_owned()))?;
        inner.memberships.remove(index);
        Ok(())
    }

    fn resource_parents(
        &self,
        resource_id: &str,
    ) -> Result<Vec<FactSheetHasParent>, InventoryError> {
        Ok(self
            .inner
            .borrow()
            .parents
            .iter()
            .filter(|relation| relation.fact_sheet_id == resource_id)
            .cloned()
            .collect())
    }

    fn create_resource_parent(
        &self,
        child_id: &str,
        parent_id: &str,
    ) -> Result<FactSheetHasParent, InventoryError> {
        let mut inner = self.inner.borrow_mut();
        let relation = FactSheetHasParent {
            id: inner.next_id("rel"),
            fact_sheet_id: child_id.to_owned(),
            fact_sheet_ref_id: parent_id.to_owned(),
        };
        inner.parents.push(relation.clone());

        // The real server recomputes the child's display name once it has a
        // parent.
        let parent_name = resource_name(&inner, parent_id);
        if let Some(child) = inner
            .resources
            .iter_mut()
            .find(|resource| resource.id == child_id)
        {
            child.display_name = format!("{}/{}", parent_name, child.name);
        }

        Ok(relation)
    }

    fn delete_resource_parent(
        &self,
        resource_id: &str,
        relation_id: &str,
    ) -> Result<(), InventoryError> {
        let mut inner = self.inner.borrow_mut();
        let index = inner
            .parents
            .iter()
            .position(|relation| {
                relation.id == relation_id && relation.fact_sheet_id == resource_id
            })
            .ok_or_else(|| InventoryError::NotFound(relation_id.to_owned()))?;
        inner.parents.remove(index);
        Ok(())
    }

    fn resource_requires(
        &self,
        resource_id: &str,
    ) -> Result<Vec<FactSheetHasRequires>, InventoryError> {
        Ok(self
            .inner
            .borrow()
            .requires
            .iter()
            .filter(|relation| relation.fact_sheet_id == resource_id)
            .cloned()
            .collect())
    }

    fn create_resource_requires(
        &self,
        resource_id: &str,
        required_id: &str,
    ) -> Result<FactSheetHasRequires, InventoryError> {
        let mut inner = self.inner.borrow_mut();
        let relation = FactSheetHasRequires {
            id: inner.next_id("rel"),
            fact_sheet_id: resource_id.to_owned(),
            fact_sheet_ref_id: required_id.to_owned(),
        };
        inner.requires.push(relation.clone());
        Ok(relation)
    }

    fn delete_resource_requires(
        &self,
        resource_id: &str,
        relation_id: &str,
    ) -> Result<(), InventoryError> {
        let mut inner = self.inner.borrow_mut();
        let index = inner
            .requires
            .iter()
            .position(|relation| {
                relation.id == relation_id && relation.fact_sheet_id == resource_id
            })
            .ok_or_else(|| InventoryError::NotFound(relation_id.to_owned()))?;
        inner.requires.remove(index);
        Ok(())
    }
}
