use std::io::Read;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use flate2::read::GzDecoder;

use super::{Schema, SchemaError};

/// Provider schema extracted from `terraform providers schema -json`,
/// reduced to resource schemas and gzip-compressed.
static EMBEDDED_SCHEMA: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schema/azurerm.json.gz"
));

static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();

/// Returns the embedded provider schema, decoding it on first use.
///
/// A payload that fails to decode yields an empty schema, which turns every
/// rule relying on it into a no-op instead of failing the host.
pub fn load() -> Arc<Schema> {
    SCHEMA
        .get_or_init(|| match load_from_gzip(EMBEDDED_SCHEMA) {
            Ok(schema) => {
                tracing::debug!(
                    resources = schema.resource_schemas.len(),
                    "embedded schema loaded"
                );
                Arc::new(schema)
            }
            Err(err) => {
                tracing::warn!(error = %err, "embedded schema unusable, falling back to empty schema");
                Arc::new(Schema::default())
            }
        })
        .clone()
}

pub fn load_from_json(data: &[u8]) -> Result<Schema, SchemaError> {
    Ok(serde_json::from_slice(data)?)
}

pub fn load_from_gzip(data: &[u8]) -> Result<Schema, SchemaError> {
    let mut json = Vec::new();
    GzDecoder::new(data)
        .read_to_end(&mut json)
        .map_err(SchemaError::Decompress)?;
    load_from_json(&json)
}

pub fn load_from_path(path: &Path) -> Result<Schema, SchemaError> {
    let data = std::fs::read(path).map_err(|source| SchemaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_gzip(&data)
}
