//! Tree renderers.
//!
//! Two walkers turn a tree into sorted text, one line per path:
//!
//! - [`dump_values`] renders a live tree: `  <path>.` for containers,
//!   `  <path> = <value>` for scalars.
//! - [`dump_schema`] renders declared structure only, including `{i}`
//!   placeholder entries for collection members, and works even when the
//!   tree would fail validation.
//!
//! Both outputs are newline-joined and sorted by byte-wise string
//! comparison; consumers diff them, so the order and format are stable.

use crate::error::Result;
use crate::node::{Node, ObjectSlot, Resolved, Template};
use crate::path::Path;

/// Render every exported path of a live tree with its value.
///
/// Walks the recursive listing, so an invalid subtree surfaces a schema
/// error rather than a silently truncated dump.
pub fn dump_values(root: &Node) -> Result<String> {
    let mut out = Vec::new();
    for path in root.list_exports(true)? {
        if path.ends_with('.') {
            out.push(format!("  {path}"));
        } else if let Resolved::Value(value) = root.get(&path)? {
            out.push(format!("  {path} = {value}"));
        }
    }
    Ok(out.join("\n"))
}

/// Render the declared structure of a tree, instances not required.
///
/// Collections contribute a container line and a templated `{i}` member
/// line, then the member template's own structure. Lines are prefixed
/// with the root's type name.
pub fn dump_schema(root: &Node) -> String {
    let mut out = Vec::new();
    collect_schema(root, &Path::from(root.type_name()), &mut out);
    out.sort();
    out.join("\n")
}

/// Render the declared structure of an uninstantiated type.
pub fn dump_schema_type(template: &Template) -> String {
    dump_schema(&template.instantiate())
}

fn collect_schema(node: &Node, path: &Path, out: &mut Vec<String>) {
    for name in node.scalar_names() {
        out.push(path.append(name).to_string());
    }
    for name in node.object_names() {
        out.push(format!("{}.", path.append(name)));
        match node.object_slot(name) {
            Some(ObjectSlot::Instance(child)) => collect_schema(child, &path.append(name), out),
            Some(ObjectSlot::Template(template)) => {
                collect_schema(&template.instantiate(), &path.append(name), out)
            }
            // declared structure is reported as far as it is known
            None => {}
        }
    }
    for name in node.collection_names() {
        out.push(format!("{}.", path.append(name)));
        let member_path = path.append(name).append("{i}");
        out.push(format!("{member_path}."));
        if let Some(template) = node.collection(name).and_then(|c| c.template()) {
            collect_schema(&template.instantiate(), &member_path, out);
        }
    }
}
