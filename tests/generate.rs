use clgn::{
    generate_file_with_options, generate_from_store, generate_svg, BundledFonts, CollagenError, ErrorKind,
    GeneratorOptions, ImportResolver, MemoryStore,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const SVG_OPEN: &str = r#"<svg xmlns="http://www.w3.org/2000/svg""#;

fn manifest(json: &str) -> MemoryStore {
    MemoryStore::new().with_file("collagen.json", json).unwrap()
}

fn fake_jsonnet(source: &str, imports: &dyn ImportResolver) -> Result<String, String> {
    // `import "name"` pulls a sibling file in verbatim, anything else passes through
    match source.trim().strip_prefix("import ") {
        Some(name) => imports
            .read_import(name.trim_matches('"'))
            .ok_or_else(|| format!("cannot import {}", name)),
        None => Ok(source.to_string()),
    }
}

fn jsonnet_options() -> GeneratorOptions {
    GeneratorOptions {
        template_compiler: Some(Arc::new(fake_jsonnet)),
        ..Default::default()
    }
}

#[test]
fn test_basic_rect() {
    let store = manifest(
        r#"{"attrs":{"viewBox":"0 0 10 10"},"children":[{"tag":"rect","attrs":{"x":0,"y":0,"width":5,"height":5,"fill":"red"}}]}"#,
    );
    assert_eq!(
        generate_svg(&store).unwrap(),
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><rect x="0" y="0" width="5" height="5" fill="red"/></svg>"#
    );
}

#[test]
fn test_root_variable_reaches_child() {
    let store = manifest(r#"{"vars":{"c":"blue"},"children":[{"tag":"circle","attrs":{"fill":"{c}"}}]}"#);
    assert_eq!(
        generate_svg(&store).unwrap(),
        format!(r#"{}><circle fill="blue"/></svg>"#, SVG_OPEN)
    );
}

#[test]
fn test_missing_image_names_asset() {
    match generate_svg(&manifest(r#"{"image_path":"missing.png"}"#)).unwrap_err() {
        CollagenError::AssetNotFound { path } => assert_eq!(path, "missing.png"),
        other => panic!("Expected asset not found, got {:?}", other),
    }
}

#[test]
fn test_self_include_is_cyclic() {
    let store = manifest(r#"{"clgn_path":"./self"}"#)
        .with_file("self/collagen.json", r#"{"clgn_path":"."}"#)
        .unwrap();
    assert_eq!(generate_svg(&store).unwrap_err().kind(), ErrorKind::CyclicInclude);
}

#[test]
fn test_two_discriminants_are_rejected() {
    let err = generate_svg(&manifest(r#"{"tag":"rect","image_path":"x.png"}"#)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    let err = generate_svg(&manifest(r#"{"children":[{"tag":"rect","foo":1}]}"#)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);
    assert!(err.to_string().contains("'foo'"));
}

#[test]
fn test_bundled_font_face() {
    let store = manifest(r#"{"children":[{"fonts":[{"name":"Impact","bundled":true}]}]}"#);
    let options = GeneratorOptions {
        fonts: Arc::new(BundledFonts::new().with_font("Impact", b"WOFF".to_vec())),
        ..Default::default()
    };
    let (svg, stats) = generate_from_store(&store, &options).unwrap();
    assert_eq!(
        svg,
        format!(
            "{}><defs><style>@font-face {{ font-family: \"Impact\"; src: url(data:font/woff2;base64,V09GRg==) format(\"woff2\"); }}</style></defs></svg>",
            SVG_OPEN
        )
    );
    assert_eq!(stats.resolve.font_face_count, 1);
}

#[test]
fn test_output_is_deterministic() {
    let store = manifest(
        r#"{"vars":{"w":3},"children":[{"tag":"g","attrs":{"z":"1","a":"2","m":"{w}"},"children":["x",{"image_path":"a.png"}]}]}"#,
    )
    .with_file("a.png", b"\x89PNG".to_vec())
    .unwrap();
    let first = generate_svg(&store).unwrap();
    let second = generate_svg(&MemoryStore::snapshot(&store).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_attribute_order_follows_manifest() {
    let store = manifest(r#"{"children":[{"tag":"rect","attrs":{"z":1,"a":2,"m":3,"b":4}}]}"#);
    assert_eq!(
        generate_svg(&store).unwrap(),
        format!(r#"{}><rect z="1" a="2" m="3" b="4"/></svg>"#, SVG_OPEN)
    );
}

#[test]
fn test_sibling_scopes_are_isolated() {
    let store = manifest(
        r#"{"children":[{"tag":"g","vars":{"x":"1"}},{"tag":"rect","attrs":{"width":"{x}"}}]}"#,
    );
    match generate_svg(&store).unwrap_err() {
        CollagenError::UnresolvedVariable { name, tag } => {
            assert_eq!(name, "x");
            assert_eq!(tag, "rect");
        }
        other => panic!("Expected unresolved variable, got {:?}", other),
    }
}

#[test]
fn test_nested_skeleton_cannot_see_parent_vars() {
    let store = manifest(r#"{"vars":{"x":"1"},"children":[{"clgn_path":"sub"}]}"#)
        .with_file("sub/collagen.json", r#"{"attrs":{"width":"{x}"}}"#)
        .unwrap();
    assert_eq!(generate_svg(&store).unwrap_err().kind(), ErrorKind::UnresolvedVariable);

    let store = manifest(r#"{"vars":{"x":"outer"},"children":[{"clgn_path":"sub"}]}"#)
        .with_file("sub/collagen.json", r#"{"vars":{"x":"inner"},"attrs":{"id":"{x}"}}"#)
        .unwrap();
    assert_eq!(
        generate_svg(&store).unwrap(),
        format!(r#"{}><g id="inner"/></svg>"#, SVG_OPEN)
    );
}

#[test]
fn test_text_escaping() {
    let store = manifest(
        r#"{"children":[{"text":"<b>&\"'</b>"},{"text":"<b>&\"'</b>","is_preescaped":true}]}"#,
    );
    assert_eq!(
        generate_svg(&store).unwrap(),
        format!(r#"{}>&lt;b&gt;&amp;"'&lt;/b&gt;<b>&"'</b></svg>"#, SVG_OPEN)
    );
}

#[test]
fn test_empty_children_stay_paired() {
    let store = manifest(r#"{"children":[{"tag":"g","children":[]},{"tag":"rect"}]}"#);
    assert_eq!(
        generate_svg(&store).unwrap(),
        format!(r#"{}><g></g><rect/></svg>"#, SVG_OPEN)
    );
}

#[test]
fn test_jsonnet_manifest_wins_over_json() {
    let store = manifest(r#"{"attrs":{"id":"plain"}}"#)
        .with_file("collagen.jsonnet", "import \"shape.json\"")
        .unwrap()
        .with_file("shape.json", r#"{"attrs":{"id":"templated"}}"#)
        .unwrap();
    let (svg, _) = generate_from_store(&store, &jsonnet_options()).unwrap();
    assert_eq!(svg, format!(r#"{} id="templated"/>"#, SVG_OPEN));

    let broken = MemoryStore::new()
        .with_file("collagen.jsonnet", "import \"absent.json\"")
        .unwrap();
    let err = generate_from_store(&broken, &jsonnet_options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ManifestCompileError);
}

#[test]
fn test_generate_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let skeleton = temp_dir.path().join("skeleton");
    fs::create_dir_all(skeleton.join("parts")).unwrap();
    fs::write(
        skeleton.join("collagen.json"),
        r#"{"attrs":{"width":4},"children":[{"clgn_path":"parts"},{"svg_path":"parts/dot.svg"}]}"#,
    )
    .unwrap();
    fs::write(skeleton.join("parts/collagen.json"), r#"{"children":[{"image_path":"p.gif"}]}"#).unwrap();
    fs::write(skeleton.join("parts/p.gif"), b"GIF").unwrap();
    fs::write(
        skeleton.join("parts/dot.svg"),
        "<svg xmlns=\"http://www.w3.org/2000/svg\"><circle r=\"1\"/></svg>",
    )
    .unwrap();

    let out_file = temp_dir.path().join("out.svg");
    let stats = generate_file_with_options(&skeleton, &out_file, &GeneratorOptions::default()).unwrap();

    assert_eq!(
        fs::read_to_string(&out_file).unwrap(),
        format!(
            r#"{} width="4"><g><image href="data:image/gif;base64,R0lG"/></g><g><circle r="1"/></g></svg>"#,
            SVG_OPEN
        )
    );
    assert_eq!(stats.resolve.include_count, 1);
    assert_eq!(stats.resolve.nested_svg_count, 1);
    assert_eq!(stats.resolve.image_count, 1);
}

#[cfg(unix)]
#[test]
fn test_symlinked_folder_back_to_ancestor_is_cyclic() {
    let temp_dir = TempDir::new().unwrap();
    let skeleton = temp_dir.path().join("skeleton");
    fs::create_dir(&skeleton).unwrap();
    fs::write(skeleton.join("collagen.json"), r#"{"children":[{"clgn_path":"loop"}]}"#).unwrap();
    std::os::unix::fs::symlink(&skeleton, skeleton.join("loop")).unwrap();

    let err = generate_file_with_options(&skeleton, temp_dir.path().join("out.svg"), &GeneratorOptions::default())
        .unwrap_err();
    match err {
        CollagenError::CyclicInclude { path, chain } => {
            assert_eq!(path, "loop");
            assert_eq!(chain, ". -> loop");
        }
        other => panic!("Expected cyclic include, got {:?}", other),
    }
}
