pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DOCS_BASE: &str = "https://github.com/jokarl/tfbreak-ruleset-azurerm/blob";

/// Documentation link for `rule_name`, pinned to this release.
pub fn reference_link(rule_name: &str) -> String {
    format!("{DOCS_BASE}/v{VERSION}/docs/rules/{rule_name}.md")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_semver_like() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.split('.').count() >= 2);
    }

    #[test]
    fn test_reference_link() {
        let link = reference_link("azurerm_force_new");
        assert!(link.starts_with("https://github.com/"));
        assert!(link.contains(VERSION));
        assert!(link.ends_with("/docs/rules/azurerm_force_new.md"));
    }
}
