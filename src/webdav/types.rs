use std::borrow::Cow;
use std::fmt;

use crate::error::UsageError;

/// A namespace-qualified XML element name, used both for requested and for returned properties.
///
/// Two names are equal only when both the namespace URI and the local name match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    namespace: Cow<'static, str>,
    name: Cow<'static, str>,
}

impl QualifiedName {
    /// Build a name at compile time. Used by the property catalogs.
    pub const fn from_static(namespace: &'static str, name: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            name: Cow::Borrowed(name),
        }
    }

    /// Build a name at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::InvalidProperty`] if the namespace is empty or the local name is not
    /// a valid XML `NCName` (empty, contains `:`, whitespace, `<`, ...).
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, UsageError> {
        let qualified = Self::from_parts(namespace.into(), name.into());
        qualified.validate()?;
        Ok(qualified)
    }

    /// Unchecked constructor for names read off the wire, where an unbound namespace is legal.
    pub(crate) fn from_parts(namespace: String, name: String) -> Self {
        Self {
            namespace: Cow::Owned(namespace),
            name: Cow::Owned(name),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The local name must be an XML `NCName`; it is written into request bodies unescaped.
    pub(crate) fn validate(&self) -> Result<(), UsageError> {
        if self.namespace.is_empty() || !is_ncname(&self.name) {
            return Err(UsageError::InvalidProperty(self.to_string()));
        }
        Ok(())
    }
}

/// `NCName` from Namespaces in XML 1.0: a `Name` without colons.
fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// Clark notation: `{DAV:}getetag`.
impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.name)
    }
}

/// Ordered list of requested properties. Duplicates are kept and nothing is sorted.
///
/// An empty set means "no property filter": the request omits its `prop` block.
pub type PropertySet = Vec<QualifiedName>;

/// Absolute path of a resource on the target server, passed through verbatim.
pub type Href = String;
