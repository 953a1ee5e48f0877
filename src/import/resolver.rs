//! Find-or-create resolution of services and resources.
//!
//! Services are resolved through the store's name-prefix search, scanning
//! the results for an exact name match. Resources are resolved against a
//! local index built once per run from a single enumeration query, keyed by
//! name and release, which keeps repeated lookups off the network and makes
//! duplicate prevention independent of server-side display-name
//! normalization.

use std::collections::HashMap;

use crate::inventory::{
    InventoryError, InventoryStore, NewResource, NewService, Resource, Service,
    RESOURCE_TYPE_SOFTWARE,
};

use super::relations;

/// Resolves the manifest's service, creating it if absent.
///
/// The description is always overwritten with the latest manifest document,
/// so an existing service is updated in place even when nothing else
/// changed.
pub fn resolve_service<S: InventoryStore>(
    store: &S,
    name: &str,
    description: &str,
) -> Result<Service, InventoryError> {
    let candidates = store.find_services(name)?;
    let existing = candidates.into_iter().find(|service| service.name == name);

    let draft = NewService {
        name: name.to_owned(),
        description: description.to_owned(),
    };

    match existing {
        Some(service) => {
            log::trace!("Updating service {} ({})", name, service.id);
            store.update_service(&service.id, &draft)
        }
        None => {
            log::trace!("Creating service {}", name);
            store.create_service(&draft)
        }
    }
}

/// Local index over every resource in the workspace, keyed by name and
/// release. Built once per run; kept up to date as the run creates and
/// updates resources.
pub struct ResourceIndex {
    by_name_release: HashMap<(String, String), Resource>,
}

impl ResourceIndex {
    pub fn load<S: InventoryStore>(store: &S) -> Result<ResourceIndex, InventoryError> {
        let mut by_name_release = HashMap::new();

        for resource in store.list_resources()? {
            let key = (resource.name.clone(), resource.release.clone());
            by_name_release.insert(key, resource);
        }

        Ok(ResourceIndex { by_name_release })
    }

    pub fn get(&self, name: &str, release: &str) -> Option<&Resource> {
        self.by_name_release
            .get(&(name.to_owned(), release.to_owned()))
    }

    pub fn insert(&mut self, resource: Resource) {
        let key = (resource.name.clone(), resource.release.clone());
        self.by_name_release.insert(key, resource);
    }
}

/// Resolves a resource by name and release, creating it if absent. An
/// existing resource is reused untouched.
pub fn find_or_create_resource<S: InventoryStore>(
    store: &S,
    index: &mut ResourceIndex,
    name: &str,
    description: &str,
    release: &str,
) -> Result<Resource, InventoryError> {
    if let Some(existing) = index.get(name, release) {
        return Ok(existing.clone());
    }

    log::trace!("Creating resource {}", name);
    let created = store.create_resource(&draft(name, description, release))?;
    index.insert(created.clone());

    Ok(created)
}

/// Resolves a resource by name and release; creates it if absent, otherwise
/// overwrites its full state and clears its outgoing dependency edges.
/// Edge recreation is left to the relation reconciler.
pub fn create_or_update_resource<S: InventoryStore>(
    store: &S,
    index: &mut ResourceIndex,
    name: &str,
    description: &str,
    release: &str,
) -> Result<Resource, InventoryError> {
    let existing = index.get(name, release).map(|resource| resource.id.clone());

    let resource = match existing {
        Some(id) => {
            log::trace!("Updating resource {} ({})", name, id);
            let updated = store.update_resource(&id, &draft(name, description, release))?;
            relations::clear_requires(store, &updated.id)?;
            updated
        }
        None => {
            log::trace!("Creating resource {}", name);
            store.create_resource(&draft(name, description, release))?
        }
    };

    index.insert(resource.clone());
    Ok(resource)
}

fn draft(name: &str, description: &str, release: &str) -> NewResource {
    NewResource {
        name: name.to_owned(),
        description: description.to_owned(),
        resource_type: RESOURCE_TYPE_SOFTWARE.to_owned(),
        release: release.to_owned(),
        tags: Vec::new(),
    }
}
