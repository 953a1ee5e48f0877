//! Rebuilds membership and dependency relations to match the manifest.
//!
//! Mutable relation kinds use full delete-then-recreate semantics rather
//! than diffing desired against existing edges. Clearing first guarantees
//! that edges removed from the manifest disappear from the store, and it
//! makes re-running after a partial failure converge to the same state.

use std::collections::HashMap;

use crate::inventory::{InventoryError, InventoryStore, NewResource, Resource, Service, IMAGE_TAG};
use crate::manifest::{is_top_level, Manifest};

use super::resolver::{self, ResourceIndex};
use super::ImportError;

/// Deletes every membership relation of the service. Runs before any
/// resource is created so that the rebuilt set reflects only the current
/// manifest's top-level keys.
pub fn clear_membership<S: InventoryStore>(
    store: &S,
    service: &Service,
) -> Result<(), InventoryError> {
    for relation in store.service_resources(&service.id)? {
        store.delete_service_resource(&service.id, &relation.id)?;
    }

    Ok(())
}

/// Attaches every top-level component resource to the service. Nested keys
/// are reachable transitively through their parent and are deliberately
/// excluded.
pub fn create_membership<S: InventoryStore>(
    store: &S,
    service: &Service,
    manifest: &Manifest,
    resources: &HashMap<String, Resource>,
) -> Result<(), InventoryError> {
    for key in manifest.components.keys() {
        if !is_top_level(key) {
            continue;
        }

        let resource = resources
            .get(key)
            .expect("resource missing for manifest key");
        store.create_service_resource(&service.id, &resource.id)?;
    }

    Ok(())
}

/// Deletes every outgoing dependency edge of the given resource.
pub fn clear_requires<S: InventoryStore>(
    store: &S,
    resource_id: &str,
) -> Result<(), InventoryError> {
    for relation in store.resource_requires(resource_id)? {
        store.delete_resource_requires(resource_id, &relation.id)?;
    }

    Ok(())
}

/// First dependency pass: per component, clear all outgoing edges and
/// recreate one edge per `links` entry.
///
/// A link naming a component key that does not exist is a data error and
/// fails the run; silently skipping it would leave the dependency graph
/// quietly incomplete.
pub fn rebuild_links<S: InventoryStore>(
    store: &S,
    manifest: &Manifest,
    resources: &HashMap<String, Resource>,
) -> Result<(), ImportError> {
    for (key, component) in &manifest.components {
        let resource = resources
            .get(key)
            .expect("resource missing for manifest key");

        clear_requires(store, &resource.id)?;

        for link in &component.links {
            let target =
                resources
                    .get(&link.component)
                    .ok_or_else(|| ImportError::UnknownLinkTarget {
                        from: key.clone(),
                        target: link.component.clone(),
                    })?;

            log::trace!("{} requires {}", key, link.component);
            store.create_resource_requires(&resource.id, &target.id)?;
        }
    }

    Ok(())
}

/// Second dependency pass: per component with an `image` field, resolve the
/// image to its own resource and add a dependency edge to it.
///
/// Image resources go through the same resolver as everything else, so the
/// same image referenced by several components collapses to one shared
/// resource.
pub fn rebuild_images<S: InventoryStore>(
    store: &S,
    index: &mut ResourceIndex,
    manifest: &Manifest,
    resources: &HashMap<String, Resource>,
) -> Result<(), ImportError> {
    for (key, component) in &manifest.components {
        let image = match &component.image {
            Some(image) => image,
            None => continue,
        };

        let resource = resources
            .get(key)
            .expect("resource missing for manifest key");

        let (image_name, image_release) = match image.split_once(':') {
            Some((name, release)) => (name, release),
            None => (image.as_str(), ""),
        };

        let image_resource =
            resolver::create_or_update_resource(store, index, image_name, "", image_release)?;

        // Mark the resource as an infrastructure artifact rather than an
        // application component.
        let mut draft = NewResource::from(&image_resource);
        draft.tags = vec![IMAGE_TAG.to_owned()];
        let image_resource = store.update_resource(&image_resource.id, &draft)?;
        index.insert(image_resource.clone());

        log::trace!("{} requires image {}", key, image);
        store.create_resource_requires(&resource.id, &image_resource.id)?;
    }

    Ok(())
}
