//! CardDAV flavour of the multiget report.

pub mod names;

use crate::webdav::multiget::MultigetKind;

/// Descriptor for `addressbook-multiget`.
pub const MULTIGET: MultigetKind = MultigetKind::ADDRESSBOOK;
