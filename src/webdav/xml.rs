use crate::webdav::types::QualifiedName;

const DECLARATION: &str = "<?xml version='1.0' encoding='utf-8'?>";
const LINE_END: &str = "\r\n";
const INDENT: &str = "  ";

pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape character data. Quotes are left alone; only attribute values need them escaped.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

struct Frame {
    tag: String,
    bindings: usize,
}

/// Pretty-printing writer producing byte-stable request bodies.
///
/// Namespaces are declared on the element that first needs them and go out of scope with it.
/// The prefix of a new binding is `ns<N>`, `N` being the number of bindings already in scope,
/// so siblings reuse the same prefix.
pub(crate) struct XmlWriter {
    out: String,
    in_scope: Vec<String>,
    open: Vec<Frame>,
}

impl XmlWriter {
    pub(crate) fn new() -> Self {
        let mut out = String::with_capacity(512);
        out.push_str(DECLARATION);
        out.push_str(LINE_END);
        Self {
            out,
            in_scope: Vec::with_capacity(4),
            open: Vec::with_capacity(4),
        }
    }

    /// Open an element that will receive children.
    pub(crate) fn start(&mut self, name: &QualifiedName) {
        let (tag, bindings) = self.write_open_tag(name);
        self.out.push('>');
        self.out.push_str(LINE_END);
        self.open.push(Frame { tag, bindings });
    }

    /// Close the innermost open element.
    pub(crate) fn end(&mut self) {
        let Some(frame) = self.open.pop() else {
            return;
        };
        self.indent();
        self.out.push_str("</");
        self.out.push_str(&frame.tag);
        self.out.push('>');
        self.out.push_str(LINE_END);
        self.release(frame.bindings);
    }

    /// Write a self-closed element: `<ns1:getetag />`.
    pub(crate) fn empty(&mut self, name: &QualifiedName) {
        let (_, bindings) = self.write_open_tag(name);
        self.out.push_str(" />");
        self.out.push_str(LINE_END);
        self.release(bindings);
    }

    /// Write an element holding only character data, on a single line.
    pub(crate) fn text_element(&mut self, name: &QualifiedName, text: &str) {
        let (tag, bindings) = self.write_open_tag(name);
        self.out.push('>');
        self.out.push_str(&escape_text(text));
        self.out.push_str("</");
        self.out.push_str(&tag);
        self.out.push('>');
        self.out.push_str(LINE_END);
        self.release(bindings);
    }

    pub(crate) fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.end();
        }
        self.out
    }

    fn indent(&mut self) {
        for _ in 0..self.open.len() {
            self.out.push_str(INDENT);
        }
    }

    fn write_open_tag(&mut self, name: &QualifiedName) -> (String, usize) {
        self.indent();
        let (prefix, declared) = match self.lookup(name.namespace()) {
            Some(index) => (format!("ns{index}"), false),
            None => {
                let index = self.in_scope.len();
                self.in_scope.push(name.namespace().to_owned());
                (format!("ns{index}"), true)
            }
        };
        let tag = format!("{prefix}:{}", name.name());
        self.out.push('<');
        self.out.push_str(&tag);
        if declared {
            self.out.push_str(" xmlns:");
            self.out.push_str(&prefix);
            self.out.push_str("=\"");
            self.out.push_str(&escape_xml(name.namespace()));
            self.out.push('"');
        }
        (tag, usize::from(declared))
    }

    fn lookup(&self, namespace: &str) -> Option<usize> {
        self.in_scope.iter().rposition(|bound| bound == namespace)
    }

    fn release(&mut self, bindings: usize) {
        let keep = self.in_scope.len().saturating_sub(bindings);
        self.in_scope.truncate(keep);
    }
}
