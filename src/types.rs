//! Core types and constants for the Collagen generator

// Manifest file names. The templated format wins when both exist.
pub const MANIFEST_JSON: &str = "collagen.json";
pub const MANIFEST_JSONNET: &str = "collagen.jsonnet";

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

// Generator limits
pub const MAX_INCLUDE_DEPTH: usize = 64;

/// An attribute list that keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrList {
    entries: Vec<(String, String)>,
}

impl AttrList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute. An existing name keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Insert an attribute before all others unless the name is taken.
    pub fn set_default_first(&mut self, name: &str, value: &str) {
        if !self.contains(name) {
            self.entries.insert(0, (name.to_string(), value.to_string()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A resolved SVG element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: AttrList,
    pub children: Vec<Node>,
    /// Serialize as `<name/>` when there are no children. Elements whose
    /// source declared a (possibly empty) child list are always paired.
    pub self_closing: bool,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: AttrList::new(),
            children: Vec::new(),
            self_closing: true,
        }
    }

    /// An element that serializes with open and close tags even when empty.
    pub fn paired(name: impl Into<String>) -> Self {
        Self {
            self_closing: false,
            ..Self::new(name)
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self.self_closing = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(TextNode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub content: String,
    /// Raw markup written without escaping. Whoever produced it is
    /// responsible for it being well-formed.
    pub is_preescaped: bool,
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(TextNode {
            content: content.into(),
            is_preescaped: false,
        })
    }

    pub fn raw(content: impl Into<String>) -> Self {
        Node::Text(TextNode {
            content: content.into(),
            is_preescaped: true,
        })
    }
}

/// Raster and vector formats that can be embedded with `<image>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Svg,
    Webp,
    Bmp,
    Ico,
    Avif,
    Tiff,
}

impl ImageKind {
    /// Look up a kind by name or file extension, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            "svg" => Self::Svg,
            "webp" => Self::Webp,
            "bmp" => Self::Bmp,
            "ico" => Self::Ico,
            "avif" => Self::Avif,
            "tif" | "tiff" => Self::Tiff,
            _ => return None,
        };
        Some(kind)
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Svg => "image/svg+xml",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Ico => "image/x-icon",
            Self::Avif => "image/avif",
            Self::Tiff => "image/tiff",
        }
    }
}

/// Font container formats usable in an `@font-face` `src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFormat {
    Woff2,
    Woff,
    TrueType,
    OpenType,
}

impl FontFormat {
    /// Format for a font file extension. Unknown extensions are treated as woff2.
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension {
            Some("woff") => Self::Woff,
            Some("ttf") => Self::TrueType,
            Some("otf") => Self::OpenType,
            _ => Self::Woff2,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Woff2 => "font/woff2",
            Self::Woff => "font/woff",
            Self::TrueType => "font/ttf",
            Self::OpenType => "font/otf",
        }
    }

    /// The CSS `format()` hint.
    pub fn css_format(self) -> &'static str {
        match self {
            Self::Woff2 => "woff2",
            Self::Woff => "woff",
            Self::TrueType => "truetype",
            Self::OpenType => "opentype",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_list_keeps_order() {
        let mut attrs = AttrList::new();
        attrs.set("y", "1");
        attrs.set("x", "2");
        attrs.set("y", "3");
        let pairs: Vec<(&str, &str)> = attrs.iter().collect();
        assert_eq!(pairs, [("y", "3"), ("x", "2")]);

        attrs.set_default_first("xmlns", SVG_NAMESPACE);
        attrs.set_default_first("x", "ignored");
        assert_eq!(attrs.iter().next(), Some(("xmlns", SVG_NAMESPACE)));
        assert_eq!(attrs.get("x"), Some("2"));
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_image_kind_lookup() {
        assert_eq!(ImageKind::from_name("PNG"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_name("jpg").map(ImageKind::mime_type), Some("image/jpeg"));
        assert_eq!(ImageKind::from_name("svg").map(ImageKind::mime_type), Some("image/svg+xml"));
        assert_eq!(ImageKind::from_name("pcx"), None);
    }

    #[test]
    fn test_font_format() {
        assert_eq!(FontFormat::from_extension(Some("ttf")).css_format(), "truetype");
        assert_eq!(FontFormat::from_extension(None), FontFormat::Woff2);
        assert_eq!(FontFormat::from_extension(Some("xyz")).mime_type(), "font/woff2");
    }

    #[test]
    fn test_element_pairing() {
        assert!(Element::new("rect").self_closing);
        assert!(!Element::paired("g").self_closing);
        assert!(!Element::new("g").with_children(Vec::new()).self_closing);
    }
}
