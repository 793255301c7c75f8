//! Integration test harness for the arbor parameter tree.
//!
//! Provides a realistic device data model, assembled the way a concrete
//! schema layer would: declare exports, bind scalars, attach child
//! objects and collections, then drive everything through the public
//! path-based surface.

use arbor_core::{Collection, Node, Placeholder, Template, Value, dump_values};

/// Member constructor for the host table.
pub fn host_template() -> Template {
    Template::new(|| {
        Node::new("Host")
            .with_scalar("Active", false)
            .with_scalar("HostName", "")
            .with_scalar("IPAddress", "")
    })
}

/// A small device model: device info, a host table, and a placeholder
/// branch for an unimplemented radio model.
pub struct TestTree {
    root: Node,
}

impl TestTree {
    /// Assemble the device tree.
    pub fn device() -> Self {
        let mut device_info = Node::new("DeviceInfo");
        device_info.declare(&["Manufacturer", "ModelName", "SerialNumber"], &[], &[]);
        device_info.bind_scalar("Manufacturer", "Acme");
        device_info.bind_scalar("ModelName", "AC-1000");
        device_info.bind_scalar("SerialNumber", "00000000");

        let mut hosts = Node::new("Hosts");
        hosts.declare(&[], &[], &["Host"]);
        hosts.attach_collection(
            "Host",
            Collection::stored("Host").with_template(host_template()),
        );

        let mut root = Node::new("Device").with_scalar("UpTime", 0u32);
        root.declare(&[], &["DeviceInfo", "Hosts", "WiFi"], &[]);
        root.attach_object("DeviceInfo", device_info);
        root.attach_object("Hosts", hosts);
        root.attach_object("WiFi", Placeholder::new());

        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Resolve a path to a scalar value.
    ///
    /// # Panics
    ///
    /// Panics if the path does not resolve to a scalar.
    pub fn value(&self, path: &str) -> Value {
        self.root
            .get(path)
            .expect("path resolves")
            .value()
            .expect("path is a scalar")
    }

    /// Add a host and return its index.
    pub fn add_host(&mut self, name: &str) -> String {
        let hosts = self.root.object_mut("Hosts").expect("Hosts bound");
        let (index, _) = hosts.add_member("Host", None).expect("Host is addable");
        hosts
            .member_mut("Host", &index)
            .expect("member just added")
            .set_scalar("HostName", name)
            .expect("HostName declared");
        index
    }

    /// Remove a host by index.
    pub fn delete_host(&mut self, index: &str) {
        self.root
            .object_mut("Hosts")
            .expect("Hosts bound")
            .delete_member("Host", index)
            .expect("host exists");
    }

    /// Full value dump of the tree.
    pub fn dump(&self) -> String {
        dump_values(&self.root).expect("tree validates")
    }
}
