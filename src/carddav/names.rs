//! Names defined by CardDAV (RFC 6352).

use crate::webdav::types::QualifiedName;

/// Namespace for elements and properties defined by CardDAV.
pub const NAMESPACE: &str = "urn:ietf:params:xml:ns:carddav";

/// Root element of the `addressbook-multiget` REPORT.
pub const ADDRESSBOOK_MULTIGET: &str = "addressbook-multiget";

pub const ADDRESS_DATA: QualifiedName = QualifiedName::from_static(NAMESPACE, "address-data");
pub const ADDRESSBOOK: QualifiedName = QualifiedName::from_static(NAMESPACE, "addressbook");
pub const ADDRESSBOOK_DESCRIPTION: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "addressbook-description");
pub const ADDRESSBOOK_HOME_SET: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "addressbook-home-set");
pub const MAX_RESOURCE_SIZE: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "max-resource-size");
pub const PRINCIPAL_ADDRESS: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "principal-address");
pub const SUPPORTED_ADDRESS_DATA: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "supported-address-data");

pub static PROPERTIES: &[QualifiedName] = &[
    ADDRESS_DATA,
    ADDRESSBOOK_DESCRIPTION,
    ADDRESSBOOK_HOME_SET,
    MAX_RESOURCE_SIZE,
    PRINCIPAL_ADDRESS,
    SUPPORTED_ADDRESS_DATA,
];
