//! Document reader: raw bytes to a checked `roxmltree` tree, plus the small
//! node helpers the importer navigates with.
//!
//! Tags are matched by local name; TBX files in the wild rarely use an XML
//! namespace on `martif`.

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::ImportError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode a TBX file as UTF-8, dropping a leading byte order mark.
///
/// # Errors
///
/// Returns `ImportError::Encoding` if the bytes are not UTF-8.
pub fn decode(bytes: &[u8]) -> Result<&str, ImportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    Ok(std::str::from_utf8(bytes)?)
}

/// Parse a TBX document and check that its root is `martif type="TBX"`.
///
/// DTDs are allowed because most TBX files declare one; the DTD itself is
/// never fetched.
///
/// # Errors
///
/// Returns `ImportError::Xml` for malformed XML and
/// `ImportError::StructuralError` for a root other than `martif type="TBX"`.
pub fn parse_document(text: &str) -> Result<Document<'_>, ImportError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)?;

    let root = doc.root_element();
    if !is_tag(root, "martif") {
        return Err(ImportError::StructuralError(format!(
            "root element is <{}>, expected <martif>",
            root.tag_name().name()
        )));
    }
    match root.attribute("type") {
        Some(kind) if kind.trim().eq_ignore_ascii_case("TBX") => Ok(doc),
        other => Err(ImportError::StructuralError(format!(
            "<martif> has type '{}', expected 'TBX'",
            other.unwrap_or_default()
        ))),
    }
}

/// Every `termEntry` in document order.
pub fn term_entries<'a, 'input>(
    doc: &'a Document<'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    descendants(doc.root_element(), "termEntry")
}

#[must_use]
pub fn is_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && node.tag_name().name() == tag
}

/// Element children of `node` named `tag`.
pub fn children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| is_tag(*n, tag))
}

/// Elements named `tag` anywhere below `node`, in document order. `node`
/// itself is never included.
pub fn descendants<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .filter(move |n| is_tag(*n, tag))
}

/// Whether `node` has `type="<kind>"`.
#[must_use]
pub fn has_type(node: Node<'_, '_>, kind: &str) -> bool {
    node.attribute("type") == Some(kind)
}

/// A trimmed attribute value, `None` when missing or blank.
#[must_use]
pub fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// The `xml:lang` attribute, trimmed, `None` when missing or blank.
#[must_use]
pub fn xml_lang<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attribute((roxmltree::NS_XML_URI, "lang"))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// The text directly inside `node`, trimmed. Text of nested elements is
/// not included.
#[must_use]
pub fn text(node: Node<'_, '_>) -> String {
    node.children()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}
