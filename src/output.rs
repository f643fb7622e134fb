use tabled::settings::Style;
use tabled::{Table, Tabled};
use termtree::Tree;

use crate::rules::RuleSet;
use crate::runner::Issue;
use crate::schema;

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Rule")]
    rule: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Message")]
    message: String,
}

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Enabled")]
    enabled: bool,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Link")]
    link: String,
}

pub fn issues_table(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return "No issues found".to_string();
    }

    let rows = issues.iter().map(|issue| IssueRow {
        severity: issue.severity.to_string(),
        rule: issue.rule.clone(),
        location: issue.range.to_string(),
        message: issue.message.clone(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn issues_json(issues: &[Issue]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(issues)
}

pub fn rules_table(rules: &RuleSet) -> String {
    let rows = rules.rules.iter().map(|rule| RuleRow {
        name: rule.name().to_string(),
        enabled: rule.enabled(),
        severity: rule.severity().to_string(),
        link: rule.link(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Renders dot-joined paths as a tree under `root`, attributes before
/// nested blocks.
pub fn path_tree<S: AsRef<str>>(root: &str, paths: &[S]) -> Tree<String> {
    let groups = schema::group_paths(paths);

    let mut tree = Tree::new(root.to_string());
    for name in groups.attributes {
        tree.push(Tree::new(name.to_string()));
    }
    for (block, rests) in groups.blocks {
        tree.push(path_tree(block, &rests));
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hclext::{Pos, Range};
    use crate::rules::{self, Severity};

    fn issue() -> Issue {
        Issue {
            rule: "azurerm_force_new".to_string(),
            severity: Severity::Error,
            message: "Changing \"location\" forces recreation".to_string(),
            range: Range {
                filename: "main.tf".to_string(),
                start: Pos { line: 4, column: 3, byte: 60 },
                end: Pos { line: 4, column: 25, byte: 82 },
            },
            link: "https://example.com".to_string(),
        }
    }

    #[test]
    fn test_issues_table_contains_issue_fields() {
        let table = issues_table(&[issue()]);
        assert!(table.contains("Severity"));
        assert!(table.contains("ERROR"));
        assert!(table.contains("azurerm_force_new"));
        assert!(table.contains("main.tf:4,3-25"));
        assert!(table.contains("forces recreation"));
    }

    #[test]
    fn test_issues_table_empty() {
        assert_eq!(issues_table(&[]), "No issues found");
    }

    #[test]
    fn test_issues_json() {
        let json = issues_json(&[issue()]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["rule"], "azurerm_force_new");
        assert_eq!(parsed[0]["severity"], "error");
        assert_eq!(parsed[0]["range"]["filename"], "main.tf");
    }

    #[test]
    fn test_rules_table() {
        let table = rules_table(rules::builtin());
        assert!(table.contains("azurerm_force_new"));
        assert!(table.contains("true"));
        assert!(table.contains("ERROR"));
    }

    #[test]
    fn test_path_tree_groups_nested_paths() {
        let tree = path_tree(
            "azurerm_linux_virtual_machine",
            &["name", "os_disk.storage_account_type", "os_disk.diff_disk_settings.option", "zone"],
        );

        assert_eq!(tree.root, "azurerm_linux_virtual_machine");
        let leaves: Vec<&str> = tree.leaves.iter().map(|t| t.root.as_str()).collect();
        assert_eq!(leaves, vec!["name", "zone", "os_disk"]);

        let os_disk = &tree.leaves[2];
        let os_disk_leaves: Vec<&str> = os_disk.leaves.iter().map(|t| t.root.as_str()).collect();
        assert_eq!(os_disk_leaves, vec!["storage_account_type", "diff_disk_settings"]);

        let rendered = tree.to_string();
        assert!(rendered.starts_with("azurerm_linux_virtual_machine\n"));
        assert!(rendered.contains("option"));
    }

    #[test]
    fn test_path_tree_empty() {
        let tree = path_tree::<&str>("azurerm_resource_group", &[]);
        assert!(tree.leaves.is_empty());
    }
}
