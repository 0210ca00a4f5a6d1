//! CalDAV flavour of the multiget report.

pub mod names;

use crate::webdav::multiget::MultigetKind;

/// Descriptor for `calendar-multiget`.
pub const MULTIGET: MultigetKind = MultigetKind::CALENDAR;
