//! HTML5 parser implementation

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use tether_dom::{Document, DomTree, NodeId};

/// HTML5 parser
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        tracing::debug!(bytes = html.len(), "parsing HTML document");

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .expect("HTML parsing should not fail");

        let mut document = Document::new();
        let root = document.tree.root();
        self.convert_node(&dom.document, document.tree_mut(), root);

        tracing::debug!(nodes = document.tree().len(), "parsed document");
        document
    }

    /// Convert an RcDom node into the arena
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
            }
            RcNodeData::Text { contents } => {
                // whitespace-only text nodes are kept; offset math depends
                // on the complete text stream
                let id = tree.create_text(&contents.borrow());
                tree.append_child(parent, id);
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id);
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(elem) = tree.get_mut(id).and_then(|n| n.as_element_mut()) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, &attr.value);
                    }
                }
                tree.append_child(parent, id);
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id);
                }
            }
            // doctypes and processing instructions carry no anchorable text
            _ => {}
        }
    }
}
