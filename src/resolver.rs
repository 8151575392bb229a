//! Resolution of validated tag trees into SVG element trees
//!
//! The resolver walks the tag tree depth first, children in document order.
//! Variables come from a [`VariableContext`] chain and nested skeletons are
//! tracked by an [`IncludeChain`]; both are plain values threaded through
//! the recursion, so independent runs never share state. Any failure aborts
//! the whole run.

use crate::ast::*;
use crate::error::{CollagenError, Result};
use crate::fonts::BundledFonts;
use crate::preprocessor::{LoadedManifest, ManifestLoader};
use crate::store::{read_text, ManifestStore};
use crate::template::TemplateCompiler;
use crate::types::*;
use crate::utils::{extension, join_path, strip_svg_wrapper};
use crate::variable_context::VariableContext;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

/// Canonical folders whose manifests are currently being resolved,
/// innermost first.
#[derive(Debug, Clone, Copy)]
pub struct IncludeChain<'a> {
    dir: &'a str,
    parent: Option<&'a IncludeChain<'a>>,
    depth: usize,
}

impl<'a> IncludeChain<'a> {
    pub fn root(dir: &'a str) -> Self {
        Self {
            dir,
            parent: None,
            depth: 1,
        }
    }

    pub fn push<'b>(&'b self, dir: &'b str) -> IncludeChain<'b> {
        IncludeChain {
            dir,
            parent: Some(self),
            depth: self.depth + 1,
        }
    }

    pub fn contains(&self, dir: &str) -> bool {
        let mut chain = Some(self);
        while let Some(current) = chain {
            if current.dir == dir {
                return true;
            }
            chain = current.parent;
        }
        false
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The chain from the outermost folder inwards, e.g. `. -> a -> a/b`.
    pub fn describe(&self) -> String {
        let mut dirs = Vec::with_capacity(self.depth);
        let mut chain = Some(self);
        while let Some(current) = chain {
            dirs.push(if current.dir.is_empty() { "." } else { current.dir });
            chain = current.parent;
        }
        dirs.reverse();
        dirs.join(" -> ")
    }
}

/// Counters collected while resolving.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolveStats {
    pub element_count: usize,
    pub text_count: usize,
    pub image_count: usize,
    pub font_face_count: usize,
    pub include_count: usize,
    pub nested_svg_count: usize,
    pub interpolation_count: usize,
    pub embedded_bytes: usize,
}

pub struct Resolver<'a> {
    store: &'a dyn ManifestStore,
    fonts: &'a BundledFonts,
    compiler: Option<&'a dyn TemplateCompiler>,
    max_include_depth: usize,
    stats: ResolveStats,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a dyn ManifestStore, fonts: &'a BundledFonts) -> Self {
        Self {
            store,
            fonts,
            compiler: None,
            max_include_depth: MAX_INCLUDE_DEPTH,
            stats: ResolveStats::default(),
        }
    }

    pub fn with_compiler(mut self, compiler: Option<&'a dyn TemplateCompiler>) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_max_include_depth(mut self, max_include_depth: usize) -> Self {
        self.max_include_depth = max_include_depth;
        self
    }

    pub fn stats(&self) -> &ResolveStats {
        &self.stats
    }

    /// Resolve a top-level manifest into the document's `<svg>` element.
    ///
    /// `globals` form the outermost scope of this manifest only; they are not
    /// visible inside nested skeletons.
    pub fn resolve_document(
        &mut self,
        manifest: &LoadedManifest,
        globals: &[(String, AttrValue)],
    ) -> Result<Element> {
        log::debug!("Resolving {}", manifest.path);
        let root_dir = self.store.canonical_dir(&manifest.dir)?;
        let chain = IncludeChain::root(&root_dir);
        let context = VariableContext::with_vars(globals);

        let mut svg = self.resolve_root(&manifest.root, &manifest.dir, &context, &chain)?;
        svg.attrs.set_default_first("xmlns", SVG_NAMESPACE);
        Ok(svg)
    }

    fn resolve_root(
        &mut self,
        root: &RootTag,
        dir: &str,
        context: &VariableContext<'_>,
        chain: &IncludeChain<'_>,
    ) -> Result<Element> {
        let scope = context.push(&root.vars);

        let mut element = Element::new("svg");
        element.attrs = self.interpolate_attrs(&root.attrs, &scope, "svg")?;
        if let Some(children) = &root.children {
            element = element.with_children(self.resolve_children(children, dir, &scope, chain)?);
        }

        self.stats.element_count += 1;
        Ok(element)
    }

    fn resolve_children(
        &mut self,
        children: &[Tag],
        dir: &str,
        context: &VariableContext<'_>,
        chain: &IncludeChain<'_>,
    ) -> Result<Vec<Node>> {
        children
            .iter()
            .map(|child| self.resolve_tag(child, dir, context, chain))
            .collect()
    }

    fn resolve_tag(
        &mut self,
        tag: &Tag,
        dir: &str,
        context: &VariableContext<'_>,
        chain: &IncludeChain<'_>,
    ) -> Result<Node> {
        match tag {
            Tag::Generic(generic) => self.resolve_generic(generic, dir, context, chain).map(Node::Element),
            Tag::Image(image) => self.resolve_image(image, dir, context, chain).map(Node::Element),
            Tag::Text(text) => self.resolve_text(text, context),
            Tag::Container(container) => self.resolve_container(container, dir, chain).map(Node::Element),
            Tag::Font(font) => self.resolve_font(font, dir, context).map(Node::Element),
            Tag::NestedSvg(nested) => self.resolve_nested_svg(nested, dir, context).map(Node::Element),
        }
    }

    fn resolve_generic(
        &mut self,
        generic: &GenericTag,
        dir: &str,
        context: &VariableContext<'_>,
        chain: &IncludeChain<'_>,
    ) -> Result<Element> {
        let scope = context.push(&generic.vars);

        let mut element = Element::new(generic.tag.clone());
        element.attrs = self.interpolate_attrs(&generic.attrs, &scope, &generic.tag)?;
        if let Some(children) = &generic.children {
            element = element.with_children(self.resolve_children(children, dir, &scope, chain)?);
        }

        self.stats.element_count += 1;
        Ok(element)
    }

    fn resolve_image(
        &mut self,
        image: &ImageTag,
        dir: &str,
        context: &VariableContext<'_>,
        chain: &IncludeChain<'_>,
    ) -> Result<Element> {
        let path = join_path(dir, &image.image_path)?;
        let bytes = self.store.read(&path)?;

        let kind = match &image.kind {
            Some(kind) => {
                let kind = ImageKind::from_name(kind).ok_or_else(|| CollagenError::UnknownImageKind {
                    path: path.clone(),
                    kind: Some(kind.clone()),
                })?;
                if extension(&path).and_then(|ext| ImageKind::from_name(&ext)).is_none() {
                    log::warn!("Image {} has no known extension, using kind '{}'", path, kind.mime_type());
                }
                kind
            }
            None => extension(&path)
                .and_then(|ext| ImageKind::from_name(&ext))
                .ok_or_else(|| CollagenError::UnknownImageKind {
                    path: path.clone(),
                    kind: None,
                })?,
        };

        log::debug!("Embedding image {} as {} ({} bytes)", path, kind.mime_type(), bytes.len());
        let scope = context.push(&image.vars);

        let mut element = Element::new("image");
        element.attrs.set("href", data_uri(kind.mime_type(), &bytes));
        for (name, value) in self.interpolate_attrs(&image.attrs, &scope, "image")?.iter() {
            element.attrs.set(name, value);
        }
        if let Some(children) = &image.children {
            element = element.with_children(self.resolve_children(children, dir, &scope, chain)?);
        }

        self.stats.element_count += 1;
        self.stats.image_count += 1;
        self.stats.embedded_bytes += bytes.len();
        Ok(element)
    }

    /// Pre-escaped text is written to the output verbatim. It can inject
    /// arbitrary markup, so only manifests that are trusted should use it.
    fn resolve_text(&mut self, text: &TextTag, context: &VariableContext<'_>) -> Result<Node> {
        self.stats.text_count += 1;

        if text.is_preescaped {
            log::warn!("Inserting {} bytes of pre-escaped text without escaping", text.text.len());
            return Ok(Node::raw(text.text.clone()));
        }

        let (content, count) = context.interpolate_counted(&text.text, "text")?;
        self.stats.interpolation_count += count;
        Ok(Node::text(content))
    }

    fn resolve_container(
        &mut self,
        container: &ContainerTag,
        dir: &str,
        chain: &IncludeChain<'_>,
    ) -> Result<Element> {
        let nested_dir = join_path(dir, &container.clgn_path)?;
        let canonical = self.store.canonical_dir(&nested_dir)?;

        if chain.contains(&canonical) {
            let display = if nested_dir.is_empty() { "." } else { nested_dir.as_str() };
            return Err(CollagenError::CyclicInclude {
                path: display.to_string(),
                chain: format!("{} -> {}", chain.describe(), display),
            });
        }
        if chain.depth() > self.max_include_depth {
            return Err(CollagenError::MaxDepthExceeded {
                limit: self.max_include_depth,
                path: nested_dir,
            });
        }

        log::debug!("Including skeleton '{}' (depth {})", nested_dir, chain.depth());
        let manifest = ManifestLoader::new(self.store, self.compiler).load(&nested_dir)?;
        let nested_chain = chain.push(&canonical);

        // nested skeletons start from an empty scope
        let fresh = VariableContext::new();
        let mut element = self.resolve_root(&manifest.root, &manifest.dir, &fresh, &nested_chain)?;
        element.name = "g".to_string();

        self.stats.include_count += 1;
        Ok(element)
    }

    fn resolve_font(
        &mut self,
        font: &FontTag,
        dir: &str,
        context: &VariableContext<'_>,
    ) -> Result<Element> {
        let mut css = String::new();

        for face in &font.fonts {
            let (bytes, format) = match &face.source {
                FontSource::Bundled => (self.fonts.get(&face.name)?.to_vec(), FontFormat::Woff2),
                FontSource::Path(path) => {
                    let path = join_path(dir, path)?;
                    let format = FontFormat::from_extension(extension(&path).as_deref());
                    (self.store.read(&path)?, format)
                }
            };

            css.push_str("@font-face { font-family: \"");
            css.push_str(&escape_css_string(&face.name));
            css.push_str("\"; src: url(");
            css.push_str(&data_uri(format.mime_type(), &bytes));
            css.push_str(") format(\"");
            css.push_str(format.css_format());
            css.push_str("\");");
            for (name, value) in self.interpolate_attrs(&face.attrs, context, "style")?.iter() {
                css.push(' ');
                css.push_str(name);
                css.push_str(": ");
                css.push_str(value);
                css.push(';');
            }
            css.push_str(" }");

            self.stats.font_face_count += 1;
            self.stats.embedded_bytes += bytes.len();
        }

        let style = Element::paired("style").with_children(vec![Node::text(css)]);
        let mut defs = Element::paired("defs").with_children(vec![Node::Element(style)]);
        defs.attrs = self.interpolate_attrs(&font.attrs, context, "defs")?;

        self.stats.element_count += 2;
        Ok(defs)
    }

    fn resolve_nested_svg(
        &mut self,
        nested: &NestedSvgTag,
        dir: &str,
        context: &VariableContext<'_>,
    ) -> Result<Element> {
        let path = join_path(dir, &nested.svg_path)?;
        let svg = read_text(self.store, &path)?;
        let inner = strip_svg_wrapper(&svg, &path)?;

        let mut group = Element::paired("g");
        group.attrs = self.interpolate_attrs(&nested.attrs, context, "g")?;
        if !inner.is_empty() {
            group.children.push(Node::raw(inner));
        }

        self.stats.element_count += 1;
        self.stats.nested_svg_count += 1;
        Ok(group)
    }

    fn interpolate_attrs(
        &mut self,
        attrs: &[(String, AttrValue)],
        context: &VariableContext<'_>,
        tag: &str,
    ) -> Result<AttrList> {
        let mut list = AttrList::new();
        for (name, value) in attrs {
            let rendered = match value {
                AttrValue::String(s) => {
                    let (rendered, count) = context.interpolate_counted(s, tag)?;
                    self.stats.interpolation_count += count;
                    rendered
                }
                number => number.to_string(),
            };
            list.set(name.clone(), rendered);
        }
        Ok(list)
    }
}

fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::MemoryStore;

    fn resolve(store: &MemoryStore) -> Result<Element> {
        resolve_with_fonts(store, &BundledFonts::new())
    }

    fn resolve_with_fonts(store: &MemoryStore, fonts: &BundledFonts) -> Result<Element> {
        let manifest = ManifestLoader::new(store, None).load("")?;
        Resolver::new(store, fonts).resolve_document(&manifest, &[])
    }

    fn skeleton(manifest: &str) -> MemoryStore {
        MemoryStore::new().with_file("collagen.json", manifest).unwrap()
    }

    fn first_element(element: &Element) -> &Element {
        match &element.children[0] {
            Node::Element(child) => child,
            other => panic!("Expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_include_chain() {
        let root = IncludeChain::root("");
        let a = root.push("a");
        let b = a.push("a/b");

        assert!(b.contains(""));
        assert!(b.contains("a"));
        assert!(!a.contains("a/b"));
        assert_eq!(b.depth(), 3);
        assert_eq!(b.describe(), ". -> a -> a/b");
    }

    #[test]
    fn test_root_gets_namespace_first() {
        let svg = resolve(&skeleton(r#"{"attrs": {"viewBox": "0 0 10 10"}}"#)).unwrap();
        let attrs: Vec<(&str, &str)> = svg.attrs.iter().collect();
        assert_eq!(attrs, [("xmlns", SVG_NAMESPACE), ("viewBox", "0 0 10 10")]);
        assert!(svg.self_closing);
    }

    #[test]
    fn test_explicit_namespace_is_kept() {
        let svg = resolve(&skeleton(r#"{"attrs": {"width": 1, "xmlns": "urn:custom"}}"#)).unwrap();
        let attrs: Vec<(&str, &str)> = svg.attrs.iter().collect();
        assert_eq!(attrs, [("width", "1"), ("xmlns", "urn:custom")]);
    }

    #[test]
    fn test_vars_apply_to_own_attrs_and_descendants() {
        let svg = resolve(&skeleton(
            r#"{"vars": {"c": "blue"}, "children": [
                {"tag": "g", "vars": {"w": 2}, "attrs": {"stroke-width": "{w}"}, "children": [
                    {"tag": "circle", "attrs": {"fill": "{c}", "r": "{w}"}}
                ]}
            ]}"#,
        ))
        .unwrap();

        let group = first_element(&svg);
        assert_eq!(group.attrs.get("stroke-width"), Some("2"));
        let circle = first_element(group);
        assert_eq!(circle.attrs.get("fill"), Some("blue"));
        assert_eq!(circle.attrs.get("r"), Some("2"));
    }

    #[test]
    fn test_sibling_vars_do_not_leak() {
        let err = resolve(&skeleton(
            r#"{"children": [
                {"tag": "g", "vars": {"x": 1}},
                {"tag": "rect", "attrs": {"x": "{x}"}}
            ]}"#,
        ))
        .unwrap_err();

        match err {
            CollagenError::UnresolvedVariable { name, tag } => {
                assert_eq!(name, "x");
                assert_eq!(tag, "rect");
            }
            other => panic!("Expected unresolved variable, got {:?}", other),
        }
    }

    #[test]
    fn test_image_embedding() {
        let store = skeleton(r#"{"children": [{"image_path": "img/dot.png", "attrs": {"width": 1}}]}"#)
            .with_file("img/dot.png", b"PNG".to_vec())
            .unwrap();
        let svg = resolve(&store).unwrap();

        let image = first_element(&svg);
        assert_eq!(image.name, "image");
        let attrs: Vec<(&str, &str)> = image.attrs.iter().collect();
        assert_eq!(attrs, [("href", "data:image/png;base64,UE5H"), ("width", "1")]);
    }

    #[test]
    fn test_image_kind_overrides_extension() {
        let store = skeleton(r#"{"children": [{"image_path": "pic.bin", "kind": "jpeg"}]}"#)
            .with_file("pic.bin", b"x".to_vec())
            .unwrap();
        let svg = resolve(&store).unwrap();
        assert!(first_element(&svg).attrs.get("href").unwrap().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_image_errors() {
        let missing = resolve(&skeleton(r#"{"children": [{"image_path": "missing.png"}]}"#)).unwrap_err();
        match missing {
            CollagenError::AssetNotFound { path } => assert_eq!(path, "missing.png"),
            other => panic!("Expected asset not found, got {:?}", other),
        }

        let store = skeleton(r#"{"children": [{"image_path": "a.xyz"}]}"#)
            .with_file("a.xyz", b"x".to_vec())
            .unwrap();
        assert_eq!(resolve(&store).unwrap_err().kind(), ErrorKind::UnknownImageKind);

        let store = skeleton(r#"{"children": [{"image_path": "a.png", "kind": "pcx"}]}"#)
            .with_file("a.png", b"x".to_vec())
            .unwrap();
        assert_eq!(resolve(&store).unwrap_err().kind(), ErrorKind::UnknownImageKind);

        let escape = resolve(&skeleton(r#"{"children": [{"image_path": "../x.png"}]}"#)).unwrap_err();
        assert_eq!(escape.kind(), ErrorKind::InvalidPath);
    }

    #[test]
    fn test_text_interpolation_and_preescaped() {
        let svg = resolve(&skeleton(
            r#"{"vars": {"name": "World"}, "children": [
                {"tag": "text", "children": ["Hello {name}", {"text": "<tspan>{name}</tspan>", "is_preescaped": true}]}
            ]}"#,
        ))
        .unwrap();

        let text = first_element(&svg);
        assert_eq!(text.children[0], Node::text("Hello World"));
        assert_eq!(text.children[1], Node::raw("<tspan>{name}</tspan>"));
    }

    #[test]
    fn test_container_renames_root_and_isolates_scope() {
        let store = skeleton(r#"{"vars": {"c": "red"}, "children": [{"clgn_path": "sub"}]}"#)
            .with_file("sub/collagen.json", r#"{"attrs": {"id": "sub"}, "children": [{"tag": "rect"}]}"#)
            .unwrap();
        let svg = resolve(&store).unwrap();

        let group = first_element(&svg);
        assert_eq!(group.name, "g");
        assert_eq!(group.attrs.get("id"), Some("sub"));
        assert!(!group.attrs.contains("xmlns"));
        assert_eq!(first_element(group).name, "rect");

        let leaky = skeleton(r#"{"vars": {"c": "red"}, "children": [{"clgn_path": "sub"}]}"#)
            .with_file("sub/collagen.json", r#"{"attrs": {"fill": "{c}"}}"#)
            .unwrap();
        assert_eq!(resolve(&leaky).unwrap_err().kind(), ErrorKind::UnresolvedVariable);
    }

    #[test]
    fn test_container_paths_are_relative_to_nested_manifest() {
        let store = skeleton(r#"{"children": [{"clgn_path": "a"}]}"#)
            .with_file("a/collagen.json", r#"{"children": [{"image_path": "pic.gif"}, {"clgn_path": "../b"}]}"#)
            .unwrap()
            .with_file("a/pic.gif", b"GIF".to_vec())
            .unwrap()
            .with_file("b/collagen.json", r#"{"attrs": {"id": "b"}}"#)
            .unwrap();
        let svg = resolve(&store).unwrap();

        let a = first_element(&svg);
        assert_eq!(first_element(a).name, "image");
        match &a.children[1] {
            Node::Element(b) => assert_eq!(b.attrs.get("id"), Some("b")),
            other => panic!("Expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_cyclic_include() {
        let store = skeleton(r#"{"children": [{"clgn_path": "./self"}]}"#)
            .with_file("self/collagen.json", r#"{"children": [{"clgn_path": "."}]}"#)
            .unwrap();
        match resolve(&store).unwrap_err() {
            CollagenError::CyclicInclude { path, chain } => {
                assert_eq!(path, "self");
                assert_eq!(chain, ". -> self -> self");
            }
            other => panic!("Expected cyclic include, got {:?}", other),
        }

        let indirect = skeleton(r#"{"children": [{"clgn_path": "a"}]}"#)
            .with_file("a/collagen.json", r#"{"children": [{"clgn_path": "../b"}]}"#)
            .unwrap()
            .with_file("b/collagen.json", r#"{"children": [{"clgn_path": ".."}]}"#)
            .unwrap();
        assert_eq!(resolve(&indirect).unwrap_err().kind(), ErrorKind::CyclicInclude);
    }

    #[test]
    fn test_sibling_includes_are_not_cycles() {
        let store = skeleton(r#"{"children": [{"clgn_path": "a"}, {"clgn_path": "a"}]}"#)
            .with_file("a/collagen.json", "{}")
            .unwrap();
        let svg = resolve(&store).unwrap();
        assert_eq!(svg.children.len(), 2);
    }

    #[test]
    fn test_max_include_depth() {
        let store = skeleton(r#"{"children": [{"clgn_path": "l1"}]}"#)
            .with_file("l1/collagen.json", r#"{"children": [{"clgn_path": "l2"}]}"#)
            .unwrap()
            .with_file("l1/l2/collagen.json", r#"{"children": [{"clgn_path": "l3"}]}"#)
            .unwrap()
            .with_file("l1/l2/l3/collagen.json", "{}")
            .unwrap();
        let fonts = BundledFonts::new();
        let manifest = ManifestLoader::new(&store, None).load("").unwrap();

        let err = Resolver::new(&store, &fonts)
            .with_max_include_depth(2)
            .resolve_document(&manifest, &[])
            .unwrap_err();
        match err {
            CollagenError::MaxDepthExceeded { limit, path } => {
                assert_eq!(limit, 2);
                assert_eq!(path, "l1/l2/l3");
            }
            other => panic!("Expected max depth error, got {:?}", other),
        }

        let mut resolver = Resolver::new(&store, &fonts).with_max_include_depth(3);
        assert!(resolver.resolve_document(&manifest, &[]).is_ok());
        assert_eq!(resolver.stats().include_count, 3);
    }

    #[test]
    fn test_bundled_and_path_fonts() {
        let store = skeleton(
            r#"{"children": [{"fonts": [
                {"name": "Impact", "bundled": true},
                {"name": "Mine", "path": "fonts/mine.ttf", "attrs": {"font-weight": "bold"}}
            ], "attrs": {"id": "f"}}]}"#,
        )
        .with_file("fonts/mine.ttf", b"TTF".to_vec())
        .unwrap();
        let fonts = BundledFonts::new().with_font("Impact", b"WOFF".to_vec());
        let svg = resolve_with_fonts(&store, &fonts).unwrap();

        let defs = first_element(&svg);
        assert_eq!(defs.name, "defs");
        assert_eq!(defs.attrs.get("id"), Some("f"));
        let style = first_element(defs);
        assert_eq!(style.name, "style");
        assert_eq!(
            style.children[0],
            Node::text(
                "@font-face { font-family: \"Impact\"; src: url(data:font/woff2;base64,V09GRg==) format(\"woff2\"); }\
                 @font-face { font-family: \"Mine\"; src: url(data:font/ttf;base64,VFRG) format(\"truetype\"); font-weight: bold; }"
            )
        );
    }

    #[test]
    fn test_unknown_bundled_font() {
        let store = skeleton(r#"{"children": [{"fonts": [{"name": "Nope", "bundled": true}]}]}"#);
        match resolve(&store).unwrap_err() {
            CollagenError::UnknownBundledFont { name } => assert_eq!(name, "Nope"),
            other => panic!("Expected unknown font, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_svg_is_inlined_verbatim() {
        let store = skeleton(r#"{"vars": {"t": "translate(1 2)"}, "children": [{"svg_path": "logo.svg", "attrs": {"transform": "{t}"}}]}"#)
            .with_file(
                "logo.svg",
                "<?xml version=\"1.0\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\"><path d=\"M0 0\"/></svg>\n",
            )
            .unwrap();
        let svg = resolve(&store).unwrap();

        let group = first_element(&svg);
        assert_eq!(group.name, "g");
        assert_eq!(group.attrs.get("transform"), Some("translate(1 2)"));
        assert_eq!(group.children, vec![Node::raw("<path d=\"M0 0\"/>")]);
    }

    #[test]
    fn test_stats() {
        let store = skeleton(r#"{"vars": {"a": 1}, "children": [{"tag": "rect", "attrs": {"x": "{a}", "y": "{a}"}}, "t"]}"#);
        let fonts = BundledFonts::new();
        let manifest = ManifestLoader::new(&store, None).load("").unwrap();
        let mut resolver = Resolver::new(&store, &fonts);
        resolver.resolve_document(&manifest, &[]).unwrap();

        let stats = resolver.stats();
        assert_eq!(stats.element_count, 2);
        assert_eq!(stats.text_count, 1);
        assert_eq!(stats.interpolation_count, 2);
    }
}
