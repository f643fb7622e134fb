//! Detects changes to force-new attributes of `azurerm` resources.
//!
//! Terraform destroys and recreates a resource when one of these attributes
//! changes, so every such change between the old and new configuration of
//! the same resource is reported as an error.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::{Rule, Severity};
use crate::error::{Error, Snapshot};
use crate::eval::{Evaluated, evaluate};
use crate::finding::{self, Finding};
use crate::hclext::{Attribute, AttributeSchema, Block, BlockSchema, BodySchema};
use crate::project;
use crate::runner::Runner;
use crate::schema::{self, PATH_SEPARATOR, Schema};

pub const RULE_NAME: &str = "azurerm_force_new";

const PROVIDER_PREFIX: &str = "azurerm_";

pub struct AzurermForceNewRule {
    schema: Arc<Schema>,
}

impl AzurermForceNewRule {
    pub fn new() -> Self {
        Self::with_schema(schema::load())
    }

    pub fn with_schema(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    /// Compares every resource present in both configurations and returns
    /// one finding per force-new attribute whose value changed.
    ///
    /// Resources only present in the new configuration are creations and
    /// never produce findings. A failure to fetch content aborts the whole
    /// detection.
    pub async fn detect(&self, runner: &dyn Runner) -> Result<Vec<Finding>, Error> {
        let mut findings = Vec::new();

        for resource_type in self.schema.resource_types() {
            if !resource_type.starts_with(PROVIDER_PREFIX) {
                continue;
            }

            let paths = self.schema.force_new_attributes(resource_type);
            if paths.is_empty() {
                continue;
            }

            let body_schema = build_body_schema(&paths);

            let old = runner
                .get_old_resource_content(resource_type, &body_schema)
                .await
                .map_err(|source| Error::Retrieval {
                    snapshot: Snapshot::Old,
                    resource_type: resource_type.to_string(),
                    source,
                })?;
            let new = runner
                .get_new_resource_content(resource_type, &body_schema)
                .await
                .map_err(|source| Error::Retrieval {
                    snapshot: Snapshot::New,
                    resource_type: resource_type.to_string(),
                    source,
                })?;

            let old_by_name: HashMap<&str, &Block> = old
                .blocks
                .iter()
                .filter_map(|block| block.name().map(|name| (name, block)))
                .collect();

            for new_block in &new.blocks {
                let Some(name) = new_block.name() else {
                    continue;
                };
                let Some(&old_block) = old_by_name.get(name) else {
                    tracing::trace!(resource_type, name, "new resource, skipping");
                    continue;
                };

                for path in &paths {
                    let old_attr = attribute_at_path(Some(old_block), path);
                    let new_attr = attribute_at_path(Some(new_block), path);

                    if let Some((old_value, new_value)) = attribute_changed(old_attr, new_attr) {
                        findings.push(Finding {
                            path: path.clone(),
                            resource_type: resource_type.to_string(),
                            name: name.to_string(),
                            old: old_value,
                            new: new_value,
                            range: finding::anchor(new_attr, new_block),
                        });
                    }
                }
            }

            tracing::debug!(
                resource_type,
                paths = paths.len(),
                old = old.blocks.len(),
                new = new.blocks.len(),
                "resource type compared"
            );
        }

        Ok(findings)
    }
}

impl Default for AzurermForceNewRule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Rule for AzurermForceNewRule {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn enabled(&self) -> bool {
        true
    }

    /// Recreation destroys the live resource, so this is never advisory.
    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn link(&self) -> String {
        project::reference_link(RULE_NAME)
    }

    async fn check(&self, runner: &dyn Runner) -> Result<(), Error> {
        let findings = self.detect(runner).await?;
        tracing::info!(count = findings.len(), "force-new changes detected");

        for finding in findings {
            runner
                .emit_issue(self, finding.message(), finding.range)
                .await
                .map_err(Error::Emit)?;
        }
        Ok(())
    }
}

/// Builds the retrieval schema for dot-joined attribute paths.
///
/// Single-segment paths become attributes; longer paths are grouped by their
/// first segment into nested block schemas. Both keep first-seen order.
pub fn build_body_schema<S: AsRef<str>>(paths: &[S]) -> BodySchema {
    let groups = schema::group_paths(paths);

    BodySchema {
        attributes: groups
            .attributes
            .into_iter()
            .map(|name| AttributeSchema {
                name: name.to_string(),
            })
            .collect(),
        blocks: groups
            .blocks
            .into_iter()
            .map(|(block_type, rests)| BlockSchema {
                block_type: block_type.to_string(),
                body: build_body_schema(&rests),
            })
            .collect(),
    }
}

/// Resolves a dot-joined path inside a block's content.
///
/// The first nested block of a matching type is descended into; a missing
/// block at any level means the attribute is absent.
pub fn attribute_at_path<'a>(block: Option<&'a Block>, path: &str) -> Option<&'a Attribute> {
    let body = block?.body.as_ref()?;

    match path.split_once(PATH_SEPARATOR) {
        None => body.attributes.get(path),
        Some((block_type, rest)) => {
            let nested = body.blocks.iter().find(|b| b.block_type == block_type);
            attribute_at_path(nested, rest)
        }
    }
}

/// Returns the old and new display values when the attribute changed.
///
/// Values are compared by their rendered text only.
pub fn attribute_changed(
    old: Option<&Attribute>,
    new: Option<&Attribute>,
) -> Option<(Evaluated, Evaluated)> {
    if old.is_none() && new.is_none() {
        return None;
    }

    let old_value = evaluate(old);
    let new_value = evaluate(new);

    let changed = match (old, new) {
        (Some(_), Some(_)) => old_value.to_string() != new_value.to_string(),
        _ => true,
    };

    changed.then_some((old_value, new_value))
}
