//! This module defines the reconciliation core of Stevedore.
//!
//! An import derives the desired state entirely from the manifest and from
//! queries against the remote store; nothing is persisted locally between
//! runs. Entities are matched by name before anything is created, mutable
//! relation kinds are cleared and rebuilt, and hierarchy is only ever
//! added. Together those rules make the import idempotent: re-running it
//! converges on the same remote state, even after a partial failure.
//!
//! The stages must run in a fixed order because later stages read entities
//! created by earlier ones. `ImportSession` makes that pipeline explicit:
//! an immutable manifest goes in, a mutable key-to-resource map is threaded
//! through the stages, and one `Deployments` metric point comes out.

mod hierarchy;
mod relations;
mod resolver;


use std::collections::HashMap;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::inventory::{InventoryError, InventoryStore, Resource, Service};
use crate::manifest::Manifest;
use crate::metrics::{MetricsError, MetricsSink, Point};

use self::resolver::ResourceIndex;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error("could not re-encode manifest data")]
    Encode {
        #[from]
        source: serde_json::Error,
    },

    #[error("component {from} links to unknown component {target}")]
    UnknownLinkTarget { from: String, target: String },
}

/// Result of a completed import run.
#[derive(Debug)]
pub struct ImportOutcome {
    pub service: Service,
    pub resource_count: usize,
    pub duration: Duration,
}

/// One reconciliation pass of a manifest against the remote store.
pub struct ImportSession<'a, S> {
    store: &'a S,
    manifest: &'a Manifest,

    /// Component key to resolved resource, built up as the run progresses.
    resources: HashMap<String, Resource>,
}

impl<'a, S: InventoryStore> ImportSession<'a, S> {
    pub fn new(store: &'a S, manifest: &'a Manifest) -> ImportSession<'a, S> {
        ImportSession {
            store,
            manifest,
            resources: HashMap::new(),
        }
    }

    /// Runs the full stage pipeline and records the deployment metric.
    pub fn run<M: MetricsSink>(
        mut self,
        metrics: &M,
        workspace_id: &str,
    ) -> Result<ImportOutcome, ImportError> {
        let start = Instant::now();

        let description = serde_json::to_string(self.manifest)?;
        let service = resolver::resolve_service(self.store, &self.manifest.name, &description)?;
        log::info!("Resolved service {}", service.name);

        // Membership is cleared before any resource exists so that the
        // rebuilt set can't keep edges from keys no longer in the manifest.
        relations::clear_membership(self.store, &service)?;

        let mut index = ResourceIndex::load(self.store)?;
        self.resolve_components(&mut index)?;
        log::info!("Resolved {} component resources", self.resources.len());

        relations::create_membership(self.store, &service, self.manifest, &self.resources)?;

        hierarchy::build(self.store, &mut index, &mut self.resources, self.manifest)?;
        log::info!("Established hierarchy");

        relations::rebuild_links(self.store, self.manifest, &self.resources)?;
        relations::rebuild_images(self.store, &mut index, self.manifest, &self.resources)?;
        log::info!("Rebuilt dependency relations");

        let duration = start.elapsed();
        metrics.create_point(&Point::deployment(workspace_id, &service.id, duration))?;
        log::info!("Recorded deployment metric");

        Ok(ImportOutcome {
            service,
            resource_count: self.resources.len(),
            duration,
        })
    }

    /// Resolves one resource per component, reusing existing resources by
    /// name so that re-runs never duplicate entities.
    fn resolve_components(&mut self, index: &mut ResourceIndex) -> Result<(), ImportError> {
        for (key, component) in &self.manifest.components {
            let description = serde_json::to_string(component)?;
            let resource =
                resolver::find_or_create_resource(self.store, index, key, &description, "")?;
            self.resources.insert(key.clone(), resource);
        }

        Ok(())
    }
}
