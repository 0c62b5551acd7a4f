//! Text decoding helpers.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. Honours a byte order mark (UTF-8 or UTF-16)
/// 2. Tries UTF-8
/// 3. If malformed, tries the hint encoding (from `<?xml encoding="..."?>`)
/// 4. Falls back to Windows-1252 (common in forms exported from old spreadsheets)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        let (result, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return result;
    }

    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Decode an XML document, using its declared encoding as the hint.
pub fn decode_xml(bytes: &[u8]) -> Cow<'_, str> {
    decode_text(bytes, extract_xml_encoding(bytes))
}

/// Extract the encoding from an XML declaration.
///
/// Looks for `<?xml ... encoding="..."?>` in the first 100 bytes.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(100);
    let prefix = &bytes[..check_len];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    let quote = *after_enc.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let value_end = after_enc[1..].iter().position(|&b| b == quote)? + 1;
    std::str::from_utf8(&after_enc[1..value_end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_text("Hello, World!".as_bytes(), None), "Hello, World!");
        assert_eq!(decode_text("日本語".as_bytes(), None), "日本語");
        assert!(matches!(decode_text(b"plain", None), Cow::Borrowed(_)));
    }

    #[test]
    fn test_decode_bom() {
        let utf8 = b"\xEF\xBB\xBF<h:html/>";
        assert_eq!(decode_text(utf8, None), "<h:html/>");
        let utf16le = b"\xFF\xFE<\x00a\x00/\x00>\x00";
        assert_eq!(decode_text(utf16le, None), "<a/>");
    }

    #[test]
    fn test_decode_with_hint_and_fallback() {
        let latin1 = b"Caf\xe9";
        assert_eq!(decode_text(latin1, Some("iso-8859-1")), "Café");
        assert_eq!(decode_text(latin1, None), "Café");
        assert_eq!(decode_text(b"\x93quoted\x94", None), "\u{201C}quoted\u{201D}");
    }

    #[test]
    fn test_extract_xml_encoding() {
        assert_eq!(
            extract_xml_encoding(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>"),
            Some("UTF-8")
        );
        assert_eq!(
            extract_xml_encoding(b"<?xml version='1.0' encoding='windows-1252'?>"),
            Some("windows-1252")
        );
        assert_eq!(extract_xml_encoding(b"<?xml version=\"1.0\"?>"), None);
        assert_eq!(extract_xml_encoding(b"<h:html/>"), None);
    }

    #[test]
    fn test_decode_xml_uses_declaration() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><a>\xe9</a>";
        assert_eq!(decode_xml(bytes), "<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><a>é</a>");
    }
}
