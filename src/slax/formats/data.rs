//! Structured dumps of the tree snapshot through serde.

use super::registry::{FormatError, Formatter};
use super::snapshot::snapshot_from_tree;
use crate::slax::building::OutputTree;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, tree: &OutputTree) -> Result<String, FormatError> {
        serde_json::to_string_pretty(&snapshot_from_tree(tree))
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Tree snapshot as pretty-printed JSON"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, tree: &OutputTree) -> Result<String, FormatError> {
        serde_yaml::to_string(&snapshot_from_tree(tree))
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Tree snapshot as YAML"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slax::building::TreeBuilder;
    use crate::slax::formats::TreeSnapshot;

    #[test]
    fn test_json_round_trips_snapshot() {
        let mut builder = TreeBuilder::new();
        builder.add_comment(" c ");
        let tree = builder.finish();

        let json = JsonFormatter.serialize(&tree).unwrap();
        let back: TreeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot_from_tree(&tree));
    }

    #[test]
    fn test_yaml_lists_children() {
        let tree = TreeBuilder::new().finish();
        let yaml = YamlFormatter.serialize(&tree).unwrap();
        assert!(yaml.contains("node_type: Element"));
        assert!(yaml.contains("children: []"));
    }
}
