pub mod multiget;
pub mod multistatus;
pub mod names;
pub mod session;
pub mod transport;
pub mod types;
pub mod xml;

pub use multiget::{MultigetKind, MultigetRequest, build_multiget_body};
pub use multistatus::{
    MalformedBlock, MultigetResponse, PropertyResult, PropertyValue, ResponseEntry, XmlElement,
};
pub use session::{REPORT, Session, SessionConfig};
pub use transport::{HyperTransport, Transport};
pub use types::{Href, PropertySet, QualifiedName};
pub use xml::{escape_text, escape_xml};
