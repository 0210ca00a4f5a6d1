//! Names defined by the WebDAV core specifications (RFC 4918, RFC 5397, RFC 6578).

use crate::webdav::types::QualifiedName;

/// Namespace for elements and properties defined by WebDAV.
pub const NAMESPACE: &str = "DAV:";

pub const CREATIONDATE: QualifiedName = QualifiedName::from_static(NAMESPACE, "creationdate");
pub const DISPLAYNAME: QualifiedName = QualifiedName::from_static(NAMESPACE, "displayname");
pub const GETCONTENTLANGUAGE: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "getcontentlanguage");
pub const GETCONTENTLENGTH: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "getcontentlength");
pub const GETCONTENTTYPE: QualifiedName = QualifiedName::from_static(NAMESPACE, "getcontenttype");
pub const GETETAG: QualifiedName = QualifiedName::from_static(NAMESPACE, "getetag");
pub const GETLASTMODIFIED: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "getlastmodified");
pub const RESOURCETYPE: QualifiedName = QualifiedName::from_static(NAMESPACE, "resourcetype");
pub const OWNER: QualifiedName = QualifiedName::from_static(NAMESPACE, "owner");
/// Defined in <https://www.rfc-editor.org/rfc/rfc5397>
pub const CURRENT_USER_PRINCIPAL: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "current-user-principal");
pub const PRINCIPAL_URL: QualifiedName = QualifiedName::from_static(NAMESPACE, "principal-URL");
pub const SUPPORTED_REPORT_SET: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "supported-report-set");
/// Defined in <https://www.rfc-editor.org/rfc/rfc6578>
pub const SYNC_TOKEN: QualifiedName = QualifiedName::from_static(NAMESPACE, "sync-token");

// Structural elements of requests and multistatus responses.
pub const COLLECTION: QualifiedName = QualifiedName::from_static(NAMESPACE, "collection");
pub const HREF: QualifiedName = QualifiedName::from_static(NAMESPACE, "href");
pub const MULTISTATUS: QualifiedName = QualifiedName::from_static(NAMESPACE, "multistatus");
pub const PROP: QualifiedName = QualifiedName::from_static(NAMESPACE, "prop");
pub const PROPSTAT: QualifiedName = QualifiedName::from_static(NAMESPACE, "propstat");
pub const RESPONSE: QualifiedName = QualifiedName::from_static(NAMESPACE, "response");
pub const RESPONSEDESCRIPTION: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "responsedescription");
pub const STATUS: QualifiedName = QualifiedName::from_static(NAMESPACE, "status");

/// Every WebDAV property in this catalog, in declaration order.
pub static PROPERTIES: &[QualifiedName] = &[
    CREATIONDATE,
    DISPLAYNAME,
    GETCONTENTLANGUAGE,
    GETCONTENTLENGTH,
    GETCONTENTTYPE,
    GETETAG,
    GETLASTMODIFIED,
    RESOURCETYPE,
    OWNER,
    CURRENT_USER_PRINCIPAL,
    PRINCIPAL_URL,
    SUPPORTED_REPORT_SET,
    SYNC_TOKEN,
];
