//! XML namespaces used by XForms and the generated documents.

/// XForms namespace, the default namespace of XForm models.
pub const XFORMS: &str = "http://www.w3.org/2002/xforms";

/// OpenRosa namespace (`orx:meta/orx:instanceID`).
pub const OPENROSA: &str = "http://openrosa.org/xforms";

/// XHTML namespace, the `h:` prefix of XForm documents.
pub const XHTML: &str = "http://www.w3.org/1999/xhtml";

/// Namespace of `xmlns` and `xmlns:*` declarations.
pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";

/// Namespace bound to the reserved `xml` prefix.
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// Fixed prefix table: `xmlns` → XForms, `orx` → OpenRosa, `h` → XHTML.
pub const NAMESPACES: [(&str, &str); 3] = [("xmlns", XFORMS), ("orx", OPENROSA), ("h", XHTML)];

/// Look up a namespace URI in the fixed prefix table.
pub fn lookup(prefix: &str) -> Option<&'static str> {
    NAMESPACES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, uri)| *uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("xmlns"), Some(XFORMS));
        assert_eq!(lookup("orx"), Some(OPENROSA));
        assert_eq!(lookup("h"), Some(XHTML));
        assert_eq!(lookup("jr"), None);
    }
}
