//! Plain-text rendering of display trees.
//!
//! For hosts without a widget toolkit (terminals, logs, test assertions).
//!
//! ```
//! use amf_inspect::builder::build_eager;
//! use amf_inspect::format::{TreeFormatOptions, TreeFormatter, TreeStyle};
//! use amf_inspect::value::{Sequence, Value};
//!
//! let node = build_eager("X", &Value::Sequence(Sequence::from_values(["a", "b"])), 0);
//! let text = TreeFormatter::with_options(TreeFormatOptions {
//!     style: TreeStyle::Ascii,
//!     ..Default::default()
//! })
//! .format_node(&node);
//! assert_eq!(text, "X: [2]\n+-- [0]: a\n`-- [1]: b\n");
//! ```

use crate::model::{NodeId, TreeModel};
use crate::node::DisplayNode;

/// Branch drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Indentation and a dash, no branch lines.
    Compact,
}

impl TreeStyle {
    /// `(branch, last branch, continuation, blank)` for this style.
    fn glyphs(self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self {
            TreeStyle::Ascii => ("+-- ", "`-- ", "|   ", "    "),
            TreeStyle::Unicode => (
                "\u{251c}\u{2500}\u{2500} ",
                "\u{2514}\u{2500}\u{2500} ",
                "\u{2502}   ",
                "    ",
            ),
            TreeStyle::Compact => ("- ", "- ", "", ""),
        }
    }
}

/// Configuration for text output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Deepest level printed, relative to the formatted node (None for unlimited).
    pub max_depth: Option<usize>,
    /// Whether to print the `...` child of collapsed nodes.
    pub show_placeholders: bool,
    /// Indent per level in [`TreeStyle::Compact`].
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            max_depth: None,
            show_placeholders: true,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Options for terse output: compact style, no placeholders.
    pub fn minimal() -> Self {
        Self {
            style: TreeStyle::Compact,
            show_placeholders: false,
            ..Default::default()
        }
    }
}

/// Renders trees as indented text, one node per line.
#[derive(Debug, Clone, Default)]
pub struct TreeFormatter {
    options: TreeFormatOptions,
}

impl TreeFormatter {
    /// Create a formatter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Formats `node` and its materialized descendants.
    pub fn format_node(&self, node: &DisplayNode) -> String {
        let mut output = String::new();
        self.format_into(node, 0, &mut Vec::new(), &mut output);
        output
    }

    /// Formats the subtree of `model` rooted at `id`, or every top-level
    /// node when `id` is `None`.
    pub fn format_model(&self, model: &TreeModel, id: Option<NodeId>) -> String {
        let roots = match id {
            Some(id) => vec![id],
            None => model.children(None),
        };
        roots
            .into_iter()
            .filter_map(|root| model.to_display_node(root))
            .map(|node| self.format_node(&node))
            .collect()
    }

    /// `guides[i]` is `true` when the ancestor at level `i + 1` was the last
    /// of its siblings.
    fn format_into(
        &self,
        node: &DisplayNode,
        level: usize,
        guides: &mut Vec<bool>,
        output: &mut String,
    ) {
        output.push_str(&self.build_prefix(level, guides));
        output.push_str(node.label());
        output.push('\n');

        if self.options.max_depth.is_some_and(|max| level >= max) {
            return;
        }

        let children: Vec<&DisplayNode> = node
            .children()
            .iter()
            .filter(|child| self.options.show_placeholders || !child.is_placeholder())
            .collect();
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            guides.push(i + 1 == count);
            self.format_into(child, level + 1, guides, output);
            guides.pop();
        }
    }

    fn build_prefix(&self, level: usize, guides: &[bool]) -> String {
        if level == 0 {
            return String::new();
        }
        let (branch, last, continuation, blank) = self.options.style.glyphs();
        let mut prefix = String::new();

        if self.options.style == TreeStyle::Compact {
            prefix.push_str(&" ".repeat(self.options.indent_size * (level - 1)));
            prefix.push_str(branch);
            return prefix;
        }

        let (own, ancestors) = match guides.split_last() {
            Some((own, ancestors)) => (*own, ancestors),
            None => (true, guides),
        };
        for &ancestor_last in ancestors {
            prefix.push_str(if ancestor_last { blank } else { continuation });
        }
        prefix.push_str(if own { last } else { branch });
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_eager, build_lazy};
    use crate::value::{Mapping, Sequence, Value};

    fn nested() -> DisplayNode {
        let inner = Mapping::from_entries("Inner", [("x", 1)]);
        let outer = Mapping::from_entries(
            "Outer",
            [("inner", Value::Mapping(inner)), ("name", Value::from("n"))],
        );
        build_eager("root", &Value::Mapping(outer), 0)
    }

    fn ascii() -> TreeFormatter {
        TreeFormatter::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..Default::default()
        })
    }

    #[test]
    fn test_ascii_nested() {
        assert_eq!(
            ascii().format_node(&nested()),
            "root: {Outer}\n+-- inner: {Inner}\n|   `-- x: 1\n`-- name: n\n"
        );
    }

    #[test]
    fn test_unicode_nested() {
        assert_eq!(
            TreeFormatter::new().format_node(&nested()),
            "root: {Outer}\n\u{251c}\u{2500}\u{2500} inner: {Inner}\n\u{2502}   \u{2514}\u{2500}\u{2500} x: 1\n\u{2514}\u{2500}\u{2500} name: n\n"
        );
    }

    #[test]
    fn test_compact() {
        let text = TreeFormatter::with_options(TreeFormatOptions::minimal()).format_node(&nested());
        assert_eq!(text, "root: {Outer}\n- inner: {Inner}\n  - x: 1\n- name: n\n");
    }

    #[test]
    fn test_max_depth() {
        let text = ascii().format_node(&nested());
        let capped = TreeFormatter::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            max_depth: Some(1),
            ..Default::default()
        })
        .format_node(&nested());
        assert_eq!(text.lines().count(), 4);
        assert_eq!(capped, "root: {Outer}\n+-- inner: {Inner}\n`-- name: n\n");
    }

    #[test]
    fn test_placeholders() {
        let value = Value::Sequence(Sequence::from_values(["a"]));
        let stub = build_lazy("X", &value, 0);

        assert_eq!(ascii().format_node(&stub), "X: [1]\n`-- ...\n");
        let hidden = TreeFormatter::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            show_placeholders: false,
            ..Default::default()
        });
        assert_eq!(hidden.format_node(&stub), "X: [1]\n");
    }

    #[test]
    fn test_format_model() {
        let model = TreeModel::default();
        let header = model.add_root("Header");
        model.add_child(header, "[0]");
        model.add_root("Body");

        assert_eq!(
            ascii().format_model(&model, None),
            "Header\n`-- [0]\nBody\n"
        );
        assert_eq!(ascii().format_model(&model, Some(header)), "Header\n`-- [0]\n");
        assert_eq!(ascii().format_model(&model, Some(9_999_999)), "");
    }
}
