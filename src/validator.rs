//! Manifest validation: classify raw JSON values into typed tags
//!
//! The variant of an object is decided by which discriminant key it
//! carries, checked in [`TAG_PRIORITY`] order. Exactly one discriminant must
//! be present and every other key must belong to that variant.

use crate::ast::*;
use crate::error::{CollagenError, Result};
use serde_json::{Map, Value};

pub struct Validator {
    manifest_path: String,
}

impl Validator {
    /// `manifest_path` only feeds error messages.
    pub fn new(manifest_path: impl Into<String>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
        }
    }

    pub fn validate_root(&self, value: &Value) -> Result<RootTag> {
        let location = "root";
        let object = value
            .as_object()
            .ok_or_else(|| self.error(location, format!("manifest must be an object, found {}", type_name(value))))?;

        // a root that is itself a tag becomes the only child of a bare <svg>
        if !present_discriminants(object).is_empty() {
            return Ok(RootTag {
                attrs: Vec::new(),
                children: Some(vec![self.validate_tag(value, location)?]),
                vars: Vec::new(),
            });
        }
        self.check_keys(object, ROOT_KEYS, "root", location)?;

        Ok(RootTag {
            attrs: self.attrs(object, location)?,
            children: self.children(object, location)?,
            vars: self.vars(object, location)?,
        })
    }

    pub fn validate_tag(&self, value: &Value, location: &str) -> Result<Tag> {
        let object = match value {
            Value::String(text) => {
                return Ok(Tag::Text(TextTag {
                    text: text.clone(),
                    is_preescaped: false,
                }))
            }
            Value::Object(object) => object,
            other => {
                return Err(self.error(
                    location,
                    format!("expected a tag object or string, found {}", type_name(other)),
                ))
            }
        };

        let kind = self.classify(object, location)?;
        self.check_keys(object, kind.allowed_keys(), kind.name(), location)?;

        let tag = match kind {
            TagKind::Container => Tag::Container(ContainerTag {
                clgn_path: self.required_string(object, "clgn_path", location)?,
            }),
            TagKind::Image => Tag::Image(ImageTag {
                image_path: self.required_string(object, "image_path", location)?,
                kind: self.optional_string(object, "kind", location)?,
                attrs: self.attrs(object, location)?,
                children: self.children(object, location)?,
                vars: self.vars(object, location)?,
            }),
            TagKind::Font => Tag::Font(FontTag {
                fonts: self.font_faces(object, location)?,
                attrs: self.attrs(object, location)?,
            }),
            TagKind::NestedSvg => Tag::NestedSvg(NestedSvgTag {
                svg_path: self.required_string(object, "svg_path", location)?,
                attrs: self.attrs(object, location)?,
            }),
            TagKind::Text => Tag::Text(TextTag {
                text: self.required_string(object, "text", location)?,
                is_preescaped: self.optional_bool(object, "is_preescaped", location)?.unwrap_or(false),
            }),
            TagKind::Generic => {
                let tag = self.required_string(object, "tag", location)?;
                if tag.is_empty() {
                    return Err(self.error(location, "'tag' must not be empty"));
                }
                Tag::Generic(GenericTag {
                    tag,
                    attrs: self.attrs(object, location)?,
                    children: self.children(object, location)?,
                    vars: self.vars(object, location)?,
                })
            }
        };

        Ok(tag)
    }

    /// Pick the single variant whose discriminant is present.
    pub fn classify(&self, object: &Map<String, Value>, location: &str) -> Result<TagKind> {
        let discriminants = present_discriminants(object);
        match discriminants.as_slice() {
            [kind] => Ok(*kind),
            [] => Err(self.error(
                location,
                format!(
                    "object has no tag key; expected exactly one of {}",
                    quote_list(TAG_PRIORITY.iter().map(|k| k.discriminant()))
                ),
            )),
            many => Err(self.error(
                location,
                format!(
                    "object has conflicting tag keys {}",
                    quote_list(many.iter().map(|k| k.discriminant()))
                ),
            )),
        }
    }

    fn check_keys(
        &self,
        object: &Map<String, Value>,
        allowed: &[&str],
        variant: &str,
        location: &str,
    ) -> Result<()> {
        let unexpected: Vec<&str> = object
            .keys()
            .map(String::as_str)
            .filter(|key| !allowed.contains(key))
            .collect();

        if unexpected.is_empty() {
            return Ok(());
        }

        Err(self.error(
            location,
            format!(
                "unexpected key{} {} for {} tag; allowed keys are {}",
                if unexpected.len() == 1 { "" } else { "s" },
                quote_list(unexpected.iter().copied()),
                variant,
                quote_list(allowed.iter().copied())
            ),
        ))
    }

    fn children(&self, object: &Map<String, Value>, location: &str) -> Result<Option<Vec<Tag>>> {
        let value = match object.get("children") {
            Some(value) => value,
            None => return Ok(None),
        };

        let mut children = Vec::new();
        self.collect_children(value, &format!("{}.children", location), &mut children)?;
        Ok(Some(children))
    }

    /// A single child is a one-element list; nested lists are flattened.
    fn collect_children(&self, value: &Value, location: &str, out: &mut Vec<Tag>) -> Result<()> {
        match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let item_location = format!("{}[{}]", location, index);
                    if item.is_array() {
                        self.collect_children(item, &item_location, out)?;
                    } else {
                        out.push(self.validate_tag(item, &item_location)?);
                    }
                }
                Ok(())
            }
            other => {
                out.push(self.validate_tag(other, location)?);
                Ok(())
            }
        }
    }

    fn attrs(&self, object: &Map<String, Value>, location: &str) -> Result<Attrs> {
        self.scalar_map(object, "attrs", location)
    }

    fn vars(&self, object: &Map<String, Value>, location: &str) -> Result<Vars> {
        let vars = self.scalar_map(object, "vars", location)?;
        for (name, _) in &vars {
            if !crate::utils::is_valid_identifier(name) {
                return Err(self.error(
                    &format!("{}.vars", location),
                    format!("'{}' is not a valid variable name", name),
                ));
            }
        }
        Ok(vars)
    }

    fn scalar_map(
        &self,
        object: &Map<String, Value>,
        key: &str,
        location: &str,
    ) -> Result<Vec<(String, AttrValue)>> {
        let map = match object.get(key) {
            None => return Ok(Vec::new()),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(self.error(
                    location,
                    format!("'{}' must be an object, found {}", key, type_name(other)),
                ))
            }
        };

        map.iter()
            .map(|(name, value)| {
                let scalar = match value {
                    Value::String(s) => AttrValue::String(s.clone()),
                    Value::Number(n) => AttrValue::Number(n.clone()),
                    other => {
                        return Err(self.error(
                            &format!("{}.{}", location, key),
                            format!(
                                "value of '{}' must be a string or number, found {}",
                                name,
                                type_name(other)
                            ),
                        ))
                    }
                };
                Ok((name.clone(), scalar))
            })
            .collect()
    }

    fn font_faces(&self, object: &Map<String, Value>, location: &str) -> Result<Vec<FontFace>> {
        let fonts_location = format!("{}.fonts", location);
        let items = match object.get("fonts") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(self.error(
                    location,
                    format!("'fonts' must be an array, found {}", type_name(other)),
                ))
            }
            None => return Ok(Vec::new()),
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.font_face(item, &format!("{}[{}]", fonts_location, index)))
            .collect()
    }

    fn font_face(&self, value: &Value, location: &str) -> Result<FontFace> {
        let object = value.as_object().ok_or_else(|| {
            self.error(location, format!("font face must be an object, found {}", type_name(value)))
        })?;
        self.check_keys(object, FONT_FACE_KEYS, "font face", location)?;

        let name = self.required_string(object, "name", location)?;
        let bundled = self.optional_bool(object, "bundled", location)?;
        let path = self.optional_string(object, "path", location)?;

        let source = match (bundled, path) {
            (Some(_), Some(_)) => {
                return Err(self.error(location, "font face cannot have both 'bundled' and 'path'"))
            }
            (Some(true), None) => FontSource::Bundled,
            (Some(false), None) => {
                return Err(self.error(location, "'bundled' must be true when given"))
            }
            (None, Some(path)) => FontSource::Path(path),
            (None, None) => {
                return Err(self.error(location, "font face needs one of 'bundled' or 'path'"))
            }
        };

        Ok(FontFace {
            name,
            source,
            attrs: self.attrs(object, location)?,
        })
    }

    fn required_string(&self, object: &Map<String, Value>, key: &str, location: &str) -> Result<String> {
        self.optional_string(object, key, location)?
            .ok_or_else(|| self.error(location, format!("missing required key '{}'", key)))
    }

    fn optional_string(&self, object: &Map<String, Value>, key: &str, location: &str) -> Result<Option<String>> {
        match object.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.error(
                location,
                format!("'{}' must be a string, found {}", key, type_name(other)),
            )),
        }
    }

    fn optional_bool(&self, object: &Map<String, Value>, key: &str, location: &str) -> Result<Option<bool>> {
        match object.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.error(
                location,
                format!("'{}' must be a boolean, found {}", key, type_name(other)),
            )),
        }
    }

    fn error(&self, location: &str, message: impl Into<String>) -> CollagenError {
        CollagenError::validation(self.manifest_path.clone(), location, message)
    }
}

fn present_discriminants(object: &Map<String, Value>) -> Vec<TagKind> {
    TAG_PRIORITY
        .iter()
        .copied()
        .filter(|kind| object.contains_key(kind.discriminant()))
        .collect()
}

fn quote_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.map(|item| format!("'{}'", item)).collect::<Vec<_>>().join(", ")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Validate a parsed manifest document.
pub fn validate_manifest(value: &Value, manifest_path: &str) -> Result<RootTag> {
    Validator::new(manifest_path).validate_root(value)
}
