//! In-process runner over two sets of HCL sources.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use hcl_edit::Span;
use hcl_edit::structure::{self, Structure};

use super::{Issue, Runner, RunnerError};
use crate::hclext::{Attribute, Block, BodyContent, BodySchema, Range};
use crate::rules::Rule;

const RESOURCE_BLOCK: &str = "resource";
const CONFIG_EXTENSION: &str = "tf";

struct SourceFile {
    name: String,
    src: String,
    body: structure::Body,
}

impl SourceFile {
    fn parse(name: &str, src: &str) -> Result<Self, RunnerError> {
        let body = hcl_edit::parser::parse_body(src).map_err(|e| RunnerError::Parse {
            file: name.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            name: name.to_string(),
            src: src.to_string(),
            body,
        })
    }

    fn range(&self, span: Option<std::ops::Range<usize>>) -> Range {
        span.map(|span| Range::new(&self.name, &self.src, span))
            .unwrap_or_default()
    }

    /// Header of a block: from its identifier up to the opening brace.
    fn def_range(&self, block: &structure::Block) -> Range {
        let Some(start) = block.ident.span().map(|s| s.start) else {
            return Range::default();
        };
        let header = self.src.get(start..).unwrap_or_default();
        let end = header
            .find('{')
            .map_or(header.len(), |brace| header[..brace].trim_end().len());
        Range::new(&self.name, &self.src, start..start + end)
    }
}

/// Serves configuration parsed from source text and buffers emitted issues.
pub struct LocalRunner {
    old: Vec<SourceFile>,
    new: Vec<SourceFile>,
    issues: Mutex<Vec<Issue>>,
}

impl LocalRunner {
    /// Each side is a list of `(file name, source)` pairs.
    pub fn from_sources<N, S>(old: &[(N, S)], new: &[(N, S)]) -> Result<Self, RunnerError>
    where
        N: AsRef<str>,
        S: AsRef<str>,
    {
        Ok(Self {
            old: parse_all(old)?,
            new: parse_all(new)?,
            issues: Mutex::new(Vec::new()),
        })
    }

    /// Loads every `.tf` file directly inside each directory.
    pub fn from_dirs(old: &Path, new: &Path) -> Result<Self, RunnerError> {
        let old = read_dir(old)?;
        let new = read_dir(new)?;
        Self::from_sources(&old, &new)
    }

    pub fn issues(&self) -> Vec<Issue> {
        self.issues
            .lock()
            .map(|issues| issues.clone())
            .unwrap_or_default()
    }
}

fn parse_all<N, S>(sources: &[(N, S)]) -> Result<Vec<SourceFile>, RunnerError>
where
    N: AsRef<str>,
    S: AsRef<str>,
{
    sources
        .iter()
        .map(|(name, src)| SourceFile::parse(name.as_ref(), src.as_ref()))
        .collect()
}

fn read_dir(dir: &Path) -> Result<Vec<(String, String)>, RunnerError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == CONFIG_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let src = std::fs::read_to_string(&path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok((name, src))
        })
        .collect()
}

fn resource_content(files: &[SourceFile], resource_type: &str, schema: &BodySchema) -> BodyContent {
    let mut content = BodyContent::default();

    for file in files {
        for block in file.body.iter().filter_map(Structure::as_block) {
            if block.ident.as_str() != RESOURCE_BLOCK {
                continue;
            }
            let labels = labels(block);
            if labels.first().map(String::as_str) != Some(resource_type) {
                continue;
            }
            content.blocks.push(Block {
                block_type: RESOURCE_BLOCK.to_string(),
                labels,
                body: Some(body_content(file, &block.body, schema)),
                def_range: file.def_range(block),
            });
        }
    }

    tracing::trace!(resource_type, count = content.blocks.len(), "resource content extracted");
    content
}

fn body_content(file: &SourceFile, body: &structure::Body, schema: &BodySchema) -> BodyContent {
    let mut content = BodyContent::default();

    for structure in body.iter() {
        match structure {
            Structure::Attribute(attr) => {
                let name = attr.key.as_str();
                if schema.attribute(name).is_none() {
                    continue;
                }
                let converted =
                    Attribute::from_expr(name, hcl::Expression::from(attr.value.clone()))
                        .with_range(file.range(attr.span()));
                content.attributes.insert(name.to_string(), converted);
            }
            Structure::Block(block) => {
                let Some(nested) = schema.block(block.ident.as_str()) else {
                    continue;
                };
                content.blocks.push(Block {
                    block_type: block.ident.as_str().to_string(),
                    labels: labels(block),
                    body: Some(body_content(file, &block.body, &nested.body)),
                    def_range: file.def_range(block),
                });
            }
        }
    }

    content
}

fn labels(block: &structure::Block) -> Vec<String> {
    block
        .labels
        .iter()
        .map(|label| label.as_str().to_string())
        .collect()
}

#[async_trait]
impl Runner for LocalRunner {
    async fn get_old_resource_content(
        &self,
        resource_type: &str,
        schema: &BodySchema,
    ) -> Result<BodyContent, RunnerError> {
        Ok(resource_content(&self.old, resource_type, schema))
    }

    async fn get_new_resource_content(
        &self,
        resource_type: &str,
        schema: &BodySchema,
    ) -> Result<BodyContent, RunnerError> {
        Ok(resource_content(&self.new, resource_type, schema))
    }

    async fn emit_issue(
        &self,
        rule: &dyn Rule,
        message: String,
        range: Range,
    ) -> Result<(), RunnerError> {
        let issue = Issue::new(rule, message, range);
        self.issues
            .lock()
            .map_err(|_| RunnerError::Host("issue buffer poisoned".to_string()))?
            .push(issue);
        Ok(())
    }
}

impl std::fmt::Debug for LocalRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalRunner")
            .field("old_files", &self.old.len())
            .field("new_files", &self.new.len())
            .finish()
    }
}
