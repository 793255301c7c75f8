//! The export-tree node.
//!
//! A [`Node`] is one addressable point in a device data model. It declares
//! which of its bindings are visible to management tools, in three
//! disjoint registries:
//!
//! - scalar parameters (name to [`Value`])
//! - singleton child objects (name to [`ObjectSlot`])
//! - child-object collections (name to [`Collection`])
//!
//! Declaration and binding are separate steps, in either order:
//! [`Node::declare`] records intent, the `bind_*`/`attach_*` methods
//! supply the live binding, and [`Node::validate`] checks that the two
//! agree across the whole subtree. Nothing is validated earlier, so
//! schema builders can assemble trees piecewise.
//!
//! External access goes through dotted paths ([`Node::get`]), checked
//! scalar writes ([`Node::set_scalar`]), indexed member creation and
//! deletion ([`Node::add_member`], [`Node::delete_member`]), and the
//! sorted enumeration behind every dump ([`Node::list_exports`]).

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::collection::KeyedCollection;
use crate::error::{Error, Result};
use crate::path::Path;
use crate::value::Value;

/// Default constructor for nodes of one schema type.
///
/// A template is the uninstantiated form of a node: collections use one to
/// construct new members, and schema dumps instantiate one to describe
/// structure that has no live instances. A template sitting where a child
/// instance belongs is a schema error caught by validation.
#[derive(Clone)]
pub struct Template {
    build: Rc<dyn Fn() -> Node>,
}

impl Template {
    pub fn new(build: impl Fn() -> Node + 'static) -> Self {
        Self {
            build: Rc::new(build),
        }
    }

    /// Construct a fresh default node.
    pub fn instantiate(&self) -> Node {
        (self.build)()
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Template")
    }
}

/// Binding for a declared singleton child object.
#[derive(Debug, Clone)]
pub enum ObjectSlot {
    /// A live child node.
    Instance(Node),
    /// An uninstantiated template. Valid for schema dumps, rejected by
    /// validation.
    Template(Template),
}

/// A child-object collection: owned or delegated members plus an optional
/// member constructor.
#[derive(Debug, Clone)]
pub struct Collection {
    members: KeyedCollection<Node>,
    template: Option<Template>,
}

impl Collection {
    /// A collection owning its members in insertion-ordered storage.
    pub fn stored(label: impl Into<String>) -> Self {
        Self {
            members: KeyedCollection::stored(label),
            template: None,
        }
    }

    /// A collection whose members come from a delegated backing.
    pub fn delegated(members: KeyedCollection<Node>) -> Self {
        Self {
            members,
            template: None,
        }
    }

    /// Attach the member constructor. Without one the collection is not
    /// addable.
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = Some(template);
        self
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn members(&self) -> &KeyedCollection<Node> {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut KeyedCollection<Node> {
        &mut self.members
    }
}

/// Result of resolving a dotted path.
#[derive(Debug, Clone)]
pub enum Resolved<'a> {
    /// The path ended at a scalar parameter.
    Value(Value),
    /// The path ended at a node: a singleton child or a collection member.
    Node(Cow<'a, Node>),
}

impl<'a> Resolved<'a> {
    pub fn value(self) -> Option<Value> {
        match self {
            Resolved::Value(v) => Some(v),
            Resolved::Node(_) => None,
        }
    }

    pub fn node(self) -> Option<Cow<'a, Node>> {
        match self {
            Resolved::Node(n) => Some(n),
            Resolved::Value(_) => None,
        }
    }

    fn into_owned(self) -> Resolved<'static> {
        match self {
            Resolved::Value(v) => Resolved::Value(v),
            Resolved::Node(n) => Resolved::Node(Cow::Owned(n.into_owned())),
        }
    }
}

/// Capability contract for schema node types.
///
/// Every type that participates in the tree exposes its underlying
/// [`Node`]; attachment APIs accept any such type. The provided methods
/// are the declared external surface, delegating to the node.
pub trait Exportable {
    fn export_node(&self) -> &Node;
    fn export_node_mut(&mut self) -> &mut Node;
    fn into_export_node(self) -> Node
    where
        Self: Sized;

    fn declare(&mut self, scalars: &[&str], objects: &[&str], collections: &[&str]) {
        self.export_node_mut().declare(scalars, objects, collections);
    }

    fn validate(&self) -> Result<()> {
        self.export_node().validate()
    }

    fn list_exports(&self, recursive: bool) -> Result<Vec<String>> {
        self.export_node().list_exports(recursive)
    }

    fn get(&self, path: &str) -> Result<Resolved<'_>> {
        self.export_node().get(path)
    }
}

impl Exportable for Node {
    fn export_node(&self) -> &Node {
        self
    }

    fn export_node_mut(&mut self) -> &mut Node {
        self
    }

    fn into_export_node(self) -> Node {
        self
    }
}

/// One addressable point in the parameter tree.
#[derive(Debug, Clone)]
pub struct Node {
    type_name: String,
    scalar_names: BTreeSet<String>,
    object_names: BTreeSet<String>,
    collection_names: BTreeSet<String>,
    scalars: IndexMap<String, Value>,
    objects: IndexMap<String, ObjectSlot>,
    collections: IndexMap<String, Collection>,
    last_index: Option<u64>,
}

impl Node {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            scalar_names: BTreeSet::new(),
            object_names: BTreeSet::new(),
            collection_names: BTreeSet::new(),
            scalars: IndexMap::new(),
            objects: IndexMap::new(),
            collections: IndexMap::new(),
            last_index: None,
        }
    }

    /// Schema type name; prefixes schema dumps of this node.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Declare exported names. Additive and idempotent; nothing is
    /// validated until [`Node::validate`].
    pub fn declare(&mut self, scalars: &[&str], objects: &[&str], collections: &[&str]) {
        self.scalar_names.extend(scalars.iter().map(|s| s.to_string()));
        self.object_names.extend(objects.iter().map(|s| s.to_string()));
        self.collection_names
            .extend(collections.iter().map(|s| s.to_string()));
    }

    pub fn scalar_names(&self) -> &BTreeSet<String> {
        &self.scalar_names
    }

    pub fn object_names(&self) -> &BTreeSet<String> {
        &self.object_names
    }

    pub fn collection_names(&self) -> &BTreeSet<String> {
        &self.collection_names
    }

    /// Bind a scalar value without a declaration check. Declare-and-bind
    /// in one step is [`Node::with_scalar`].
    pub fn bind_scalar(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.scalars.insert(name.into(), value.into());
    }

    /// Builder form: declare a scalar and bind its initial value.
    pub fn with_scalar(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.declare(&[name], &[], &[]);
        self.bind_scalar(name, value);
        self
    }

    /// Bind a singleton child object.
    pub fn attach_object(&mut self, name: impl Into<String>, child: impl Exportable) {
        self.objects
            .insert(name.into(), ObjectSlot::Instance(child.into_export_node()));
    }

    /// Bind an uninstantiated template where a child object is declared.
    /// Schema dumps accept this; validation rejects it.
    pub fn attach_object_template(&mut self, name: impl Into<String>, template: Template) {
        self.objects
            .insert(name.into(), ObjectSlot::Template(template));
    }

    /// Bind a collection.
    pub fn attach_collection(&mut self, name: impl Into<String>, collection: Collection) {
        self.collections.insert(name.into(), collection);
    }

    /// The bound value of a scalar, if any.
    pub fn scalar(&self, name: &str) -> Option<&Value> {
        self.scalars.get(name)
    }

    /// The bound child instance under `name`, if it is an instance.
    pub fn object(&self, name: &str) -> Option<&Node> {
        match self.objects.get(name) {
            Some(ObjectSlot::Instance(node)) => Some(node),
            _ => None,
        }
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut Node> {
        match self.objects.get_mut(name) {
            Some(ObjectSlot::Instance(node)) => Some(node),
            _ => None,
        }
    }

    /// The bound object slot under `name`, instance or template.
    pub fn object_slot(&self, name: &str) -> Option<&ObjectSlot> {
        self.objects.get(name)
    }

    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    pub fn collection_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.collections.get_mut(name)
    }

    /// Write an exported scalar.
    ///
    /// Fails with a lookup error unless `name` is declared as a scalar.
    /// Binds the value if the scalar was declared but never bound.
    pub fn set_scalar(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if !self.scalar_names.contains(name) {
            return Err(Error::NotAScalar(name.to_string()));
        }
        let value = value.into();
        trace!(scalar = name, value = %value, "scalar set");
        self.scalars.insert(name.to_string(), value);
        Ok(())
    }

    /// Resolve a dotted path.
    ///
    /// Segments resolve left to right: a declared scalar terminates the
    /// path, a declared object descends, a declared collection consumes
    /// the following segment as a member index and descends. Any
    /// unresolved segment fails with a lookup error carrying the full
    /// path; an empty segment (trailing dot) is a caller error rejected
    /// up front.
    pub fn get(&self, path: &str) -> Result<Resolved<'_>> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(Error::InvalidPath(path.to_string()));
        }
        self.resolve(&segments).map_err(|e| {
            if e.is_lookup() {
                Error::NoSuchPath(path.to_string())
            } else {
                e
            }
        })
    }

    fn resolve(&self, segments: &[&str]) -> Result<Resolved<'_>> {
        let Some((&segment, rest)) = segments.split_first() else {
            return Ok(Resolved::Node(Cow::Borrowed(self)));
        };
        if self.scalar_names.contains(segment) {
            if !rest.is_empty() {
                return Err(Error::NoSuchPath(segment.to_string()));
            }
            let value = self
                .scalars
                .get(segment)
                .ok_or_else(|| Error::NoSuchExport(segment.to_string()))?;
            return Ok(Resolved::Value(value.clone()));
        }
        if self.object_names.contains(segment) {
            return match self.objects.get(segment) {
                Some(ObjectSlot::Instance(child)) => child.resolve(rest),
                _ => Err(Error::NoSuchExport(segment.to_string())),
            };
        }
        if self.collection_names.contains(segment) {
            let collection = self
                .collections
                .get(segment)
                .ok_or_else(|| Error::NoSuchExport(segment.to_string()))?;
            // a collection name must be followed by an index segment
            let Some((&index, tail)) = rest.split_first() else {
                return Err(Error::NoSuchPath(segment.to_string()));
            };
            return match collection.members().get(index)? {
                Cow::Borrowed(member) => member.resolve(tail),
                Cow::Owned(member) => member.resolve(tail).map(Resolved::into_owned),
            };
        }
        Err(Error::NoSuchExport(segment.to_string()))
    }

    /// Create a collection member.
    ///
    /// With `index: None` the per-node allocator picks the next free
    /// index: it scans upward from the last issued index plus one,
    /// skipping occupied indices, and never rewinds once issued. An
    /// explicit index must not contain `.`; that is rejected before any
    /// mutation. Returns the normalized index and the new member.
    pub fn add_member(&mut self, name: &str, index: Option<&str>) -> Result<(String, Cow<'_, Node>)> {
        if !self.collection_names.contains(name) {
            return Err(Error::NotACollection(name.to_string()));
        }
        let template = self
            .collections
            .get(name)
            .ok_or_else(|| Error::NotACollection(name.to_string()))?
            .template()
            .cloned()
            .ok_or_else(|| Error::NotAddable(name.to_string()))?;
        let index = match index {
            Some(raw) => {
                if raw.contains('.') {
                    return Err(Error::InvalidIndex(raw.to_string()));
                }
                raw.to_string()
            }
            None => self.allocate_index(name)?,
        };
        let member = template.instantiate();
        let Some(collection) = self.collections.get_mut(name) else {
            return Err(Error::NotACollection(name.to_string()));
        };
        collection.members_mut().set(&index, member)?;
        debug!(collection = name, index = %index, "member added");
        let member = self
            .collections
            .get(name)
            .ok_or_else(|| Error::NotACollection(name.to_string()))?
            .members()
            .get(&index)?;
        Ok((index, member))
    }

    fn allocate_index(&mut self, name: &str) -> Result<String> {
        let Some(collection) = self.collections.get(name) else {
            return Err(Error::NotACollection(name.to_string()));
        };
        let mut candidate = self.last_index.map_or(0, |last| last + 1);
        while collection.members().contains(&candidate.to_string())? {
            candidate += 1;
        }
        self.last_index = Some(candidate);
        Ok(candidate.to_string())
    }

    /// Mutable access to an owned collection member.
    pub fn member_mut(&mut self, name: &str, index: &str) -> Result<&mut Node> {
        if !self.collection_names.contains(name) {
            return Err(Error::NotACollection(name.to_string()));
        }
        let Some(collection) = self.collections.get_mut(name) else {
            return Err(Error::NotACollection(name.to_string()));
        };
        collection.members_mut().get_mut(index)
    }

    /// Remove and discard a collection member.
    pub fn delete_member(&mut self, name: &str, index: &str) -> Result<()> {
        if !self.collection_names.contains(name) {
            return Err(Error::NotACollection(name.to_string()));
        }
        let Some(collection) = self.collections.get_mut(name) else {
            return Err(Error::NotACollection(name.to_string()));
        };
        if !collection.members().contains(index)? {
            return Err(Error::NoSuchMember {
                name: name.to_string(),
                index: index.to_string(),
            });
        }
        collection.members_mut().delete(index)?;
        debug!(collection = name, index = index, "member deleted");
        Ok(())
    }

    /// Enumerate exported paths, sorted by string comparison.
    ///
    /// Non-recursive: scalar names as-is, object and collection names
    /// with a trailing dot. Recursive: validates the subtree first, then
    /// includes every child's entries under `name.` and, for collections,
    /// a `name.index.` container entry plus the member's entries for
    /// every live member.
    pub fn list_exports(&self, recursive: bool) -> Result<Vec<String>> {
        if recursive {
            self.validate()?;
        }
        let mut out = Vec::new();
        self.collect_exports(recursive, "", &mut out)?;
        out.sort();
        Ok(out)
    }

    fn collect_exports(&self, recursive: bool, prefix: &str, out: &mut Vec<String>) -> Result<()> {
        for name in &self.scalar_names {
            out.push(format!("{prefix}{name}"));
        }
        for name in &self.object_names {
            out.push(format!("{prefix}{name}."));
            if recursive {
                if let Some(ObjectSlot::Instance(child)) = self.objects.get(name) {
                    child.collect_exports(true, &format!("{prefix}{name}."), out)?;
                }
            }
        }
        for name in &self.collection_names {
            out.push(format!("{prefix}{name}."));
            if recursive {
                if let Some(collection) = self.collections.get(name) {
                    for (index, member) in collection.members().iterate()? {
                        let member_prefix = format!("{prefix}{name}.{index}.");
                        out.push(member_prefix.clone());
                        member.collect_exports(true, &member_prefix, out)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Check every declaration in this subtree against its live binding.
    ///
    /// Fails on the first structural problem, with the full dotted path
    /// (rooted at `root`) of the offending declaration:
    ///
    /// - a name declared in more than one registry
    /// - a declared name with no binding
    /// - a declared child object bound to a template instead of an
    ///   instance
    /// - a declared collection whose members cannot be enumerated
    ///
    /// Recurses into every child object and every collection member.
    pub fn validate(&self) -> Result<()> {
        self.validate_at(&Path::from("root"))
    }

    fn validate_at(&self, path: &Path) -> Result<()> {
        for name in &self.scalar_names {
            if self.object_names.contains(name) || self.collection_names.contains(name) {
                return Err(Error::DuplicateExport(path.append(name)));
            }
        }
        for name in &self.object_names {
            if self.collection_names.contains(name) {
                return Err(Error::DuplicateExport(path.append(name)));
            }
        }
        for name in &self.scalar_names {
            if !self.scalars.contains_key(name) {
                return Err(Error::MissingExport(path.append(name)));
            }
        }
        for name in &self.object_names {
            match self.objects.get(name) {
                None => return Err(Error::MissingExport(path.append(name))),
                Some(ObjectSlot::Template(_)) => {
                    debug!(object = %path.append(name), "template bound where instance expected");
                    return Err(Error::NotInstantiated(path.append(name)));
                }
                Some(ObjectSlot::Instance(child)) => child.validate_at(&path.append(name))?,
            }
        }
        for name in &self.collection_names {
            let collection = match self.collections.get(name) {
                None => return Err(Error::MissingExport(path.append(name))),
                Some(c) => c,
            };
            let entries = collection
                .members()
                .iterate()
                .map_err(|_| Error::NotIterable(path.append(name)))?;
            for (index, member) in &entries {
                member.validate_at(&path.append(name).append(index))?;
            }
        }
        Ok(())
    }
}
