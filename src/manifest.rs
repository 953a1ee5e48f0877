//! Defines the topology manifest format and how it is loaded from disk.
//!
//! A manifest describes one named service as a map of components. Component
//! keys may contain a `/` to express single-level nesting; everything before
//! the first separator names the parent component, everything after it is
//! the leaf name.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Separator used inside component keys to express hierarchy.
pub const HIERARCHY_SEPARATOR: char = '/';

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not read manifest file")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("malformed manifest file")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// The topology descriptor for one service, parsed from a JSON document.
///
/// Unknown top-level fields are preserved so that the document can be
/// re-encoded as the service's description blob without losing anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Name of the service this manifest describes.
    pub name: String,

    /// All components of the service, keyed by component key. A BTreeMap
    /// keeps iteration over components deterministic between runs.
    pub components: BTreeMap<String, Component>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One named unit within the manifest's `components` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Other components this component depends on, in manifest order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    /// Container image reference, optionally of the form `name:tag`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single entry in a component's `links` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub component: String,
}

impl Manifest {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Manifest, ManifestError> {
        let contents = fs_err::read_to_string(path.as_ref())?;
        let manifest = serde_json::from_str(&contents)?;

        Ok(manifest)
    }
}

/// Splits a nested component key into its parent key and leaf name.
///
/// Returns `None` for top-level keys. Only the first separator nests;
/// later separators are part of the leaf name.
pub fn split_nested(key: &str) -> Option<(&str, &str)> {
    key.split_once(HIERARCHY_SEPARATOR)
}

/// Whether a component key names a top-level component.
pub fn is_top_level(key: &str) -> bool {
    !key.contains(HIERARCHY_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use serde_json::json;

    fn manifest_from(value: Value) -> Manifest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parse_components() {
        let manifest = manifest_from(json!({
            "name": "shop",
            "components": {
                "web": {
                    "image": "nginx:1.21",
                    "links": [{ "component": "api" }],
                },
                "api": {},
            },
        }));

        assert_eq!(manifest.name, "shop");
        assert_eq!(manifest.components.len(), 2);

        let web = &manifest.components["web"];
        assert_eq!(web.image.as_deref(), Some("nginx:1.21"));
        assert_eq!(web.links.len(), 1);
        assert_eq!(web.links[0].component, "api");

        let api = &manifest.components["api"];
        assert!(api.image.is_none());
        assert!(api.links.is_empty());
    }

    #[test]
    fn unknown_fields_round_trip() {
        let document = json!({
            "name": "shop",
            "release": "v2",
            "components": {
                "web": {
                    "image": "nginx",
                    "ports": [80, 443],
                },
            },
        });

        let manifest = manifest_from(document.clone());
        assert_eq!(manifest.extra["release"], json!("v2"));
        assert_eq!(manifest.components["web"].extra["ports"], json!([80, 443]));

        let round_tripped = serde_json::to_value(&manifest).unwrap();
        assert_eq!(round_tripped, document);
    }

    #[test]
    fn missing_name_is_an_error() {
        let result: Result<Manifest, _> = serde_json::from_value(json!({
            "components": {},
        }));

        assert!(result.is_err());
    }

    #[test]
    fn components_must_be_an_object() {
        let result: Result<Manifest, _> = serde_json::from_value(json!({
            "name": "shop",
            "components": ["web"],
        }));

        assert!(result.is_err());
    }

    #[test]
    fn nested_key_splitting() {
        assert_eq!(split_nested("db/primary"), Some(("db", "primary")));
        assert_eq!(split_nested("db/primary/eu"), Some(("db", "primary/eu")));
        assert_eq!(split_nested("web"), None);

        assert!(is_top_level("web"));
        assert!(!is_top_level("db/primary"));
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "name": "shop", "components": {{ "web": {{}} }} }}"#
        )
        .unwrap();

        let manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.name, "shop");
        assert!(manifest.components.contains_key("web"));
    }
}
