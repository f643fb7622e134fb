//! Provider schema model.
//!
//! A [`Schema`] maps resource types to their block structure and records which
//! attributes force the resource to be destroyed and recreated when changed.

mod loader;

pub use loader::{load, load_from_gzip, load_from_json, load_from_path};

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separates the segments of an attribute path such as `identity.type`.
pub const PATH_SEPARATOR: char = '.';

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to decompress schema: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("failed to decode schema: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read schema from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub resource_schemas: BTreeMap<String, ResourceSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSchema {
    /// `None` when the provider published no structural information.
    #[serde(default)]
    pub block: Option<BlockSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockSchema {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeSchema>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub block_types: BTreeMap<String, NestedBlockSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeSchema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub force_new: bool,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NestedBlockSchema {
    #[serde(default)]
    pub nesting_mode: NestingMode,
    #[serde(default)]
    pub block: Option<BlockSchema>,
    #[serde(default)]
    pub min_items: u32,
    #[serde(default)]
    pub max_items: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestingMode {
    Single,
    Group,
    List,
    Set,
    Map,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Schema {
    pub fn resource_types(&self) -> Vec<&str> {
        self.resource_schemas.keys().map(String::as_str).collect()
    }

    pub fn has_resource(&self, resource_type: &str) -> bool {
        self.resource_schemas.contains_key(resource_type)
    }

    /// Every force-new attribute of `resource_type` as a dot-joined path,
    /// including attributes inside nested blocks at any depth.
    ///
    /// Attributes of a block come before the paths of its nested blocks.
    /// Unknown resource types yield an empty list.
    pub fn force_new_attributes(&self, resource_type: &str) -> Vec<String> {
        let Some(block) = self.block(resource_type) else {
            return Vec::new();
        };

        let mut paths = Vec::new();
        collect_force_new(block, None, &mut paths);
        paths
    }

    /// Whether the dot-joined `path` addresses a force-new attribute.
    ///
    /// A path naming only a nested block is never force-new, and attributes
    /// cannot be descended into.
    pub fn is_force_new(&self, resource_type: &str, path: &str) -> bool {
        self.block(resource_type)
            .is_some_and(|block| is_force_new_in_block(block, path))
    }

    /// Total number of force-new attributes across all resource types.
    pub fn count_force_new(&self) -> usize {
        self.resource_schemas
            .values()
            .filter_map(|rs| rs.block.as_ref())
            .map(count_force_new_in_block)
            .sum()
    }

    fn block(&self, resource_type: &str) -> Option<&BlockSchema> {
        self.resource_schemas
            .get(resource_type)
            .and_then(|rs| rs.block.as_ref())
    }
}

/// Dot-joined paths split at their first segment.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PathGroups<'a> {
    /// Single-segment paths, deduplicated, in first-seen order.
    pub attributes: Vec<&'a str>,
    /// Remaining segments keyed by their first segment, in first-seen order.
    pub blocks: Vec<(&'a str, Vec<&'a str>)>,
}

pub fn group_paths<S: AsRef<str>>(paths: &[S]) -> PathGroups<'_> {
    let mut groups = PathGroups::default();

    for path in paths {
        let path = path.as_ref();
        match path.split_once(PATH_SEPARATOR) {
            None => {
                if !groups.attributes.contains(&path) {
                    groups.attributes.push(path);
                }
            }
            Some((first, rest)) => {
                match groups.blocks.iter_mut().find(|(existing, _)| *existing == first) {
                    Some((_, rests)) => rests.push(rest),
                    None => groups.blocks.push((first, vec![rest])),
                }
            }
        }
    }

    groups
}

fn join_path(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}{PATH_SEPARATOR}{name}"),
        None => name.to_string(),
    }
}

fn collect_force_new(block: &BlockSchema, prefix: Option<&str>, paths: &mut Vec<String>) {
    for (name, attr) in &block.attributes {
        if attr.force_new {
            paths.push(join_path(prefix, name));
        }
    }

    for (name, nested) in &block.block_types {
        if let Some(child) = &nested.block {
            let nested_prefix = join_path(prefix, name);
            collect_force_new(child, Some(&nested_prefix), paths);
        }
    }
}

fn is_force_new_in_block(block: &BlockSchema, path: &str) -> bool {
    let (name, rest) = match path.split_once(PATH_SEPARATOR) {
        Some((name, rest)) => (name, Some(rest)),
        None => (path, None),
    };

    if let Some(attr) = block.attributes.get(name) {
        return rest.is_none() && attr.force_new;
    }

    match (block.block_types.get(name), rest) {
        (Some(nested), Some(rest)) => nested
            .block
            .as_ref()
            .is_some_and(|child| is_force_new_in_block(child, rest)),
        _ => false,
    }
}

fn count_force_new_in_block(block: &BlockSchema) -> usize {
    let own = block.attributes.values().filter(|a| a.force_new).count();
    let nested: usize = block
        .block_types
        .values()
        .filter_map(|nested| nested.block.as_ref())
        .map(count_force_new_in_block)
        .sum();
    own + nested
}
