use std::collections::HashSet;

use dav_multiget::webdav::names as dav;
use dav_multiget::{QualifiedName, UsageError, caldav, carddav};

#[test]
fn test_namespaces() {
    assert_eq!(dav::NAMESPACE, "DAV:");
    assert_eq!(carddav::names::NAMESPACE, "urn:ietf:params:xml:ns:carddav");
    assert_eq!(caldav::names::NAMESPACE, "urn:ietf:params:xml:ns:caldav");
}

#[test]
fn test_well_known_properties() {
    assert_eq!(dav::GETETAG.namespace(), "DAV:");
    assert_eq!(dav::GETETAG.name(), "getetag");
    assert_eq!(dav::DISPLAYNAME.name(), "displayname");
    assert_eq!(
        carddav::names::ADDRESS_DATA,
        QualifiedName::new("urn:ietf:params:xml:ns:carddav", "address-data").unwrap()
    );
    assert_eq!(
        caldav::names::CALENDAR_DATA,
        QualifiedName::new("urn:ietf:params:xml:ns:caldav", "calendar-data").unwrap()
    );
}

#[test]
fn test_catalogs_hold_valid_unique_names() {
    for catalog in [dav::PROPERTIES, carddav::names::PROPERTIES, caldav::names::PROPERTIES] {
        let unique: HashSet<_> = catalog.iter().collect();
        assert_eq!(unique.len(), catalog.len());
        for name in catalog {
            assert!(QualifiedName::new(name.namespace(), name.name()).is_ok());
        }
    }
    assert!(dav::PROPERTIES.contains(&dav::GETETAG));
    assert!(carddav::names::PROPERTIES.contains(&carddav::names::ADDRESS_DATA));
    assert!(caldav::names::PROPERTIES.contains(&caldav::names::CALENDAR_DATA));
}

#[test]
fn test_equality_needs_namespace_and_name() {
    let a = QualifiedName::new("DAV:", "getetag").unwrap();
    let b = QualifiedName::new("http://example.com/ns/", "getetag").unwrap();
    assert_eq!(a, dav::GETETAG);
    assert_ne!(a, b);
    // Same local name, different namespaces.
    assert_ne!(carddav::names::MAX_RESOURCE_SIZE, caldav::names::MAX_RESOURCE_SIZE);
}

#[test]
fn test_display_uses_clark_notation() {
    assert_eq!(dav::GETETAG.to_string(), "{DAV:}getetag");
    assert_eq!(
        carddav::names::ADDRESS_DATA.to_string(),
        "{urn:ietf:params:xml:ns:carddav}address-data"
    );
}

#[test]
fn test_empty_parts_are_rejected() {
    assert_eq!(
        QualifiedName::new("", "getetag"),
        Err(UsageError::InvalidProperty("{}getetag".to_string()))
    );
    assert!(matches!(
        QualifiedName::new("DAV:", ""),
        Err(UsageError::InvalidProperty(_))
    ));
}

#[test]
fn test_multiget_descriptors() {
    assert_eq!(carddav::MULTIGET.root, "addressbook-multiget");
    assert_eq!(carddav::MULTIGET.namespace, carddav::names::NAMESPACE);
    assert_eq!(caldav::MULTIGET.root, "calendar-multiget");
    assert_eq!(
        caldav::MULTIGET.root_name().to_string(),
        "{urn:ietf:params:xml:ns:caldav}calendar-multiget"
    );
}
