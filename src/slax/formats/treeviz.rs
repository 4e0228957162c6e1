//! Treeviz formatter for the output tree
//!
//! One line per node, nesting drawn with box connectors:
//!
//! ```text
//! ◆ xsl:stylesheet version="1.0"
//! ├─ ※ header
//! └─ ◆ xsl:template match="/"
//!    └─ ◦ hello
//! ```
//!
//! Labels are truncated to 40 characters. Namespace declarations are left
//! out; `show-linum` prefixes each line with the element's source line.

use super::registry::{FormatError, Formatter};
use super::snapshot::{snapshot_from_tree, TreeSnapshot};
use crate::slax::building::OutputTree;
use std::collections::HashMap;

const LABEL_WIDTH: usize = 40;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Element" => "◆",
        "Text" => "◦",
        "Comment" => "※",
        _ => "○",
    }
}

fn label(snapshot: &TreeSnapshot) -> String {
    if snapshot.node_type != "Element" {
        return truncate(&snapshot.label.replace('\n', "↵"), LABEL_WIDTH);
    }
    let mut label = snapshot.label.clone();
    for (name, value) in &snapshot.attributes {
        if !name.starts_with("xmlns") {
            label.push_str(&format!(" {}=\"{}\"", name, value));
        }
    }
    truncate(&label, LABEL_WIDTH)
}

fn format_snapshot(
    snapshot: &TreeSnapshot,
    prefix: &str,
    is_last: bool,
    show_linum: bool,
    output: &mut String,
) {
    let connector = if is_last { "└─" } else { "├─" };
    if show_linum {
        output.push_str(&format!("{:02} ", snapshot.line));
    }
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        get_icon(&snapshot.node_type),
        label(snapshot)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    let count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        format_snapshot(child, &child_prefix, i + 1 == count, show_linum, output);
    }
}

pub fn to_treeviz_str(tree: &OutputTree) -> String {
    to_treeviz_str_with_params(tree, &HashMap::new())
}

pub fn to_treeviz_str_with_params(tree: &OutputTree, params: &HashMap<String, String>) -> String {
    let show_linum = params
        .get("show-linum")
        .map(|v| v != "false")
        .unwrap_or(false);

    let snapshot = snapshot_from_tree(tree);
    let mut output = String::new();
    if show_linum {
        output.push_str(&format!("{:02} ", snapshot.line));
    }
    output.push_str(&format!("{} {}\n", get_icon(&snapshot.node_type), label(&snapshot)));

    let count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        format_snapshot(child, "", i + 1 == count, show_linum, &mut output);
    }
    output
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, tree: &OutputTree) -> Result<String, FormatError> {
        Ok(to_treeviz_str(tree))
    }

    fn description(&self) -> &str {
        "One line per node with box-drawing connectors"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slax::building::TreeBuilder;

    #[test]
    fn test_connectors() {
        let mut builder = TreeBuilder::new();
        builder.add_comment("first");
        builder.open("out").unwrap();
        builder.add_comment("inner");
        builder.close().unwrap();
        let tree = builder.finish();

        assert_eq!(
            to_treeviz_str(&tree),
            "◆ xsl:stylesheet version=\"1.0\"\n\
             ├─ ※ first\n\
             └─ ◆ out\n\
             \x20  └─ ※ inner\n"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc…");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
