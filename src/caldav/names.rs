//! Names defined by CalDAV (RFC 4791) and its scheduling extension (RFC 6638).

use crate::webdav::types::QualifiedName;

/// Namespace for elements and properties defined by CalDAV.
pub const NAMESPACE: &str = "urn:ietf:params:xml:ns:caldav";

/// Root element of the `calendar-multiget` REPORT.
pub const CALENDAR_MULTIGET: &str = "calendar-multiget";

pub const CALENDAR: QualifiedName = QualifiedName::from_static(NAMESPACE, "calendar");
pub const CALENDAR_DATA: QualifiedName = QualifiedName::from_static(NAMESPACE, "calendar-data");
pub const CALENDAR_DESCRIPTION: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "calendar-description");
/// Defined in <https://www.rfc-editor.org/rfc/rfc4791#section-6.2.1>
pub const CALENDAR_HOME_SET: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "calendar-home-set");
pub const CALENDAR_TIMEZONE: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "calendar-timezone");
pub const MAX_RESOURCE_SIZE: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "max-resource-size");
pub const SUPPORTED_CALENDAR_COMPONENT_SET: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "supported-calendar-component-set");
pub const SUPPORTED_CALENDAR_DATA: QualifiedName =
    QualifiedName::from_static(NAMESPACE, "supported-calendar-data");
/// Defined in <https://www.rfc-editor.org/rfc/rfc6638#section-3.2.10>
pub const SCHEDULE_TAG: QualifiedName = QualifiedName::from_static(NAMESPACE, "schedule-tag");

pub static PROPERTIES: &[QualifiedName] = &[
    CALENDAR_DATA,
    CALENDAR_DESCRIPTION,
    CALENDAR_HOME_SET,
    CALENDAR_TIMEZONE,
    MAX_RESOURCE_SIZE,
    SUPPORTED_CALENDAR_COMPONENT_SET,
    SUPPORTED_CALENDAR_DATA,
    SCHEDULE_TAG,
];
