//! Infers parent/child structure from nested component keys and creates the
//! corresponding hierarchy relations.
//!
//! Hierarchy is additive: the importer creates `FactSheetHasParent` edges
//! but never deletes them, so nesting persists even when a key later
//! disappears from the manifest.

use std::collections::HashMap;

use crate::inventory::{InventoryStore, Resource};
use crate::manifest::{split_nested, Manifest};

use super::resolver::{self, ResourceIndex};
use super::ImportError;

/// Creates hierarchy relations for every nested key in the manifest.
///
/// A parent that is not itself a component is resolved find-or-create, so
/// a key like `db/primary` works without a separator-free `db` sibling.
/// Children that already have a parent relation are skipped; that guard is
/// what makes repeated runs idempotent.
pub fn build<S: InventoryStore>(
    store: &S,
    index: &mut ResourceIndex,
    resources: &mut HashMap<String, Resource>,
    manifest: &Manifest,
) -> Result<(), ImportError> {
    for key in manifest.components.keys() {
        let (parent_key, _leaf) = match split_nested(key) {
            Some(parts) => parts,
            None => continue,
        };

        let child_id = resources
            .get(key)
            .expect("resource missing for manifest key")
            .id
            .clone();

        if !store.resource_parents(&child_id)?.is_empty() {
            log::trace!("{} already has a parent, skipping", key);
            continue;
        }

        let parent = match resources.get(parent_key) {
            Some(parent) => parent.clone(),
            None => {
                let parent =
                    resolver::find_or_create_resource(store, index, parent_key, "", "")?;
                resources.insert(parent_key.to_owned(), parent.clone());
                parent
            }
        };

        log::trace!("Attaching {} to parent {}", key, parent_key);
        store.create_resource_parent(&child_id, &parent.id)?;

        // The server recomputes the child's display name once the relation
        // exists; refresh our copy of it.
        let refreshed = store.get_resource(&child_id)?;
        resources.insert(key.clone(), refreshed);
    }

    Ok(())
}
