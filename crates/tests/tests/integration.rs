//! End-to-end scenarios against a realistic device model.
//!
//! Everything goes through the public surface: assemble, validate,
//! address by dotted path, mutate the host table, dump.

use arbor_core::{Error, Value, dump_schema};
use arbor_tests::{TestTree, host_template};

#[test]
fn test_device_tree_validates() {
    assert!(TestTree::device().root().validate().is_ok());
}

/// The full dump of a fresh tree, byte for byte: sorted paths, container
/// lines, quoted strings, bare numbers.
#[test]
fn test_full_dump_of_fresh_tree() {
    let tree = TestTree::device();
    let expected = "\
  DeviceInfo.
  DeviceInfo.Manufacturer = \"Acme\"
  DeviceInfo.ModelName = \"AC-1000\"
  DeviceInfo.SerialNumber = \"00000000\"
  Hosts.
  Hosts.Host.
  UpTime = 0
  WiFi.
  WiFi.TODO = \"not implemented yet\"";
    assert_eq!(tree.dump(), expected);
}

#[test]
fn test_path_addressing() {
    let tree = TestTree::device();
    assert_eq!(tree.value("DeviceInfo.Manufacturer"), Value::from("Acme"));
    assert_eq!(tree.value("UpTime"), Value::from(0u32));
    assert_eq!(tree.value("WiFi.TODO"), Value::from("not implemented yet"));
}

#[test]
fn test_path_errors_reach_the_caller() {
    let tree = TestTree::device();

    let err = tree.root().get("DeviceInfo.NoSuchParam").unwrap_err();
    assert!(err.is_lookup());

    // trailing dot is a caller error, not a lookup miss
    let err = tree.root().get("DeviceInfo.").unwrap_err();
    assert!(matches!(err, Error::InvalidPath(_)));
}

/// Hosts come and go; indices are allocated per parent node and are
/// never reissued.
#[test]
fn test_host_lifecycle() {
    let mut tree = TestTree::device();

    let first = tree.add_host("laptop");
    let second = tree.add_host("printer");
    assert_eq!(first, "0");
    assert_eq!(second, "1");
    assert_eq!(tree.value("Hosts.Host.0.HostName"), Value::from("laptop"));
    assert_eq!(tree.value("Hosts.Host.1.HostName"), Value::from("printer"));

    tree.delete_host("0");
    assert!(tree.root().get("Hosts.Host.0.HostName").is_err());
    assert_eq!(tree.value("Hosts.Host.1.HostName"), Value::from("printer"));

    // the freed index is not reused
    let third = tree.add_host("phone");
    assert_eq!(third, "2");
}

#[test]
fn test_dump_reflects_mutations() {
    let mut tree = TestTree::device();
    tree.add_host("laptop");
    tree.root_mut()
        .object_mut("Hosts")
        .unwrap()
        .member_mut("Host", "0")
        .unwrap()
        .set_scalar("Active", true)
        .unwrap();

    let dump = tree.dump();
    assert!(dump.contains("  Hosts.Host.0.\n"));
    assert!(dump.contains("  Hosts.Host.0.Active = true"));
    assert!(dump.contains("  Hosts.Host.0.HostName = \"laptop\""));

    tree.delete_host("0");
    assert!(!tree.dump().contains("Hosts.Host.0."));
}

#[test]
fn test_recursive_listing_is_sorted() {
    let mut tree = TestTree::device();
    tree.add_host("b");
    tree.add_host("a");

    let listing = tree.root().list_exports(true).unwrap();
    let mut sorted = listing.clone();
    sorted.sort();
    assert_eq!(listing, sorted);

    // one container entry per live member
    assert!(listing.contains(&"Hosts.Host.0.".to_string()));
    assert!(listing.contains(&"Hosts.Host.1.".to_string()));
}

/// The schema dump describes the host table without a single live host.
#[test]
fn test_schema_dump_needs_no_instances() {
    let tree = TestTree::device();
    let schema = dump_schema(tree.root());

    assert!(schema.contains("Device.Hosts.Host.\n"));
    assert!(schema.contains("Device.Hosts.Host.{i}.\n"));
    assert!(schema.contains("Device.Hosts.Host.{i}.HostName"));
    assert!(schema.contains("Device.WiFi.TODO"));
    assert!(!schema.contains("Device.Hosts.Host.0"));
}

#[test]
fn test_host_template_is_self_contained() {
    let host = host_template().instantiate();
    assert!(host.validate().is_ok());
    assert_eq!(
        host.list_exports(true).unwrap(),
        vec!["Active", "HostName", "IPAddress"]
    );
}
