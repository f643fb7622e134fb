use crate::eval::Evaluated;
use crate::hclext::{Attribute, Block, Range};

const NOT_SET: &str = "<not set>";

/// A force-new attribute whose value differs between the old and new
/// configuration of the same resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub path: String,
    pub resource_type: String,
    pub name: String,
    pub old: Evaluated,
    pub new: Evaluated,
    pub range: Range,
}

impl Finding {
    pub fn message(&self) -> String {
        format!(
            "Changing {:?} forces recreation of {}.{} (old: {}, new: {}). \
             Consider using a moved-resource declaration or creating a new resource with a different name.",
            self.path,
            self.resource_type,
            self.name,
            display_value(&self.old.to_string()),
            display_value(&self.new.to_string()),
        )
    }
}

pub fn display_value(rendered: &str) -> &str {
    if rendered.is_empty() { NOT_SET } else { rendered }
}

/// Where a finding points: the new attribute when it exists, otherwise the
/// declaration of the new resource block.
pub fn anchor(new_attr: Option<&Attribute>, new_block: &Block) -> Range {
    match new_attr {
        Some(attr) => attr.range.clone(),
        None => new_block.def_range.clone(),
    }
}
