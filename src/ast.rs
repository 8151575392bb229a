//! Typed tag tree produced by the validator

use crate::utils::format_number;
use std::fmt;

/// A scalar attribute or variable value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    String(String),
    Number(serde_json::Number),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(s) => f.write_str(s),
            AttrValue::Number(n) => f.write_str(&format_number(n)),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Number(value.into())
    }
}

/// Ordered name/value pairs. Declaration order is output order.
pub type Attrs = Vec<(String, AttrValue)>;

/// Ordered variable definitions scoped to a tag and its descendants.
pub type Vars = Vec<(String, AttrValue)>;

/// The top of a manifest. Becomes the `<svg>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootTag {
    pub attrs: Attrs,
    /// `None` when the manifest has no `children` key.
    pub children: Option<Vec<Tag>>,
    pub vars: Vars,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Container(ContainerTag),
    Image(ImageTag),
    Font(FontTag),
    NestedSvg(NestedSvgTag),
    Text(TextTag),
    Generic(GenericTag),
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        match self {
            Tag::Container(_) => TagKind::Container,
            Tag::Image(_) => TagKind::Image,
            Tag::Font(_) => TagKind::Font,
            Tag::NestedSvg(_) => TagKind::NestedSvg,
            Tag::Text(_) => TagKind::Text,
            Tag::Generic(_) => TagKind::Generic,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericTag {
    pub tag: String,
    pub attrs: Attrs,
    pub children: Option<Vec<Tag>>,
    pub vars: Vars,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageTag {
    pub image_path: String,
    pub kind: Option<String>,
    pub attrs: Attrs,
    pub children: Option<Vec<Tag>>,
    pub vars: Vars,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextTag {
    pub text: String,
    pub is_preescaped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerTag {
    pub clgn_path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontTag {
    pub fonts: Vec<FontFace>,
    pub attrs: Attrs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NestedSvgTag {
    pub svg_path: String,
    pub attrs: Attrs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    pub name: String,
    pub source: FontSource,
    /// Extra `@font-face` descriptors, emitted in order.
    pub attrs: Attrs,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FontSource {
    Bundled,
    Path(String),
}

/// Tag variants that are selected by a discriminant key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Container,
    Image,
    Font,
    NestedSvg,
    Text,
    Generic,
}

/// Order in which discriminant keys are checked. When an object carries
/// several of them the error lists them in this order.
pub const TAG_PRIORITY: [TagKind; 6] = [
    TagKind::Container,
    TagKind::Image,
    TagKind::Font,
    TagKind::NestedSvg,
    TagKind::Text,
    TagKind::Generic,
];

pub const ROOT_KEYS: &[&str] = &["attrs", "children", "vars"];
pub const FONT_FACE_KEYS: &[&str] = &["name", "bundled", "path", "attrs"];

impl TagKind {
    pub fn discriminant(self) -> &'static str {
        match self {
            TagKind::Container => "clgn_path",
            TagKind::Image => "image_path",
            TagKind::Font => "fonts",
            TagKind::NestedSvg => "svg_path",
            TagKind::Text => "text",
            TagKind::Generic => "tag",
        }
    }

    /// Every key the variant accepts, discriminant first.
    pub fn allowed_keys(self) -> &'static [&'static str] {
        match self {
            TagKind::Container => &["clgn_path"],
            TagKind::Image => &["image_path", "kind", "attrs", "children", "vars"],
            TagKind::Font => &["fonts", "attrs"],
            TagKind::NestedSvg => &["svg_path", "attrs"],
            TagKind::Text => &["text", "is_preescaped"],
            TagKind::Generic => &["tag", "attrs", "children", "vars"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TagKind::Container => "container",
            TagKind::Image => "image",
            TagKind::Font => "font",
            TagKind::NestedSvg => "nested svg",
            TagKind::Text => "text",
            TagKind::Generic => "generic",
        }
    }
}
