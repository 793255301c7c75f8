//! Stand-in node for unimplemented schema branches.

use crate::node::{Exportable, Node, Template};

/// Sentinel value bound to a placeholder's single scalar.
pub const SENTINEL: &str = "not implemented yet";

/// A stub node declaring exactly one scalar, `TODO`, bound to a fixed
/// sentinel string. Drops into any object or collection slot whose real
/// model does not exist yet; validates trivially and shows up in both
/// dump forms like any other node.
#[derive(Debug, Clone)]
pub struct Placeholder {
    node: Node,
}

impl Placeholder {
    pub fn new() -> Self {
        let mut node = Node::new("Placeholder");
        node.declare(&["TODO"], &[], &[]);
        node.bind_scalar("TODO", SENTINEL);
        Self { node }
    }

    /// Template producing placeholder nodes, for use as a collection's
    /// member constructor.
    pub fn template() -> Template {
        Template::new(|| Placeholder::new().into_export_node())
    }
}

impl Default for Placeholder {
    fn default() -> Self {
        Self::new()
    }
}

impl Exportable for Placeholder {
    fn export_node(&self) -> &Node {
        &self.node
    }

    fn export_node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn into_export_node(self) -> Node {
        self.node
    }
}
