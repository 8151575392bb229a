//! XML serialization of resolved element trees
//!
//! Output is a single line with no indentation. Attributes keep their
//! insertion order and are always double-quoted.

use crate::types::{Element, Node};
use crate::utils::escape_attr;
use quick_xml::escape::partial_escape;

#[derive(Debug, Default)]
pub struct CodeGenerator {
    output: String,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `root` and return the document text.
    pub fn generate(mut self, root: &Element) -> String {
        self.write_element(root);
        self.output
    }

    fn write_element(&mut self, element: &Element) {
        self.output.push('<');
        self.output.push_str(&element.name);
        for (name, value) in element.attrs.iter() {
            self.output.push(' ');
            self.output.push_str(name);
            self.output.push_str("=\"");
            self.output.push_str(&escape_attr(value));
            self.output.push('"');
        }

        if element.children.is_empty() && element.self_closing {
            self.output.push_str("/>");
            return;
        }

        self.output.push('>');
        for child in &element.children {
            self.write_node(child);
        }
        self.output.push_str("</");
        self.output.push_str(&element.name);
        self.output.push('>');
    }

    fn write_node(&mut self, node: &Node) {
        match node {
            Node::Element(element) => self.write_element(element),
            Node::Text(text) if text.is_preescaped => self.output.push_str(&text.content),
            // only `&`, `<` and `>` are escaped in character data
            Node::Text(text) => self.output.push_str(&partial_escape(text.content.as_str())),
        }
    }
}

/// Serialize an element tree to an XML string.
pub fn to_xml(root: &Element) -> String {
    CodeGenerator::new().generate(root)
}
