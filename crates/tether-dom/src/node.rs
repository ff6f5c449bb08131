//! DOM Node - compact representation
//!
//! Sibling/child links are `NodeId` handles rather than pointers, matching
//! the arena layout in `DomTree`.

use crate::NodeId;

/// DOM node with intrusive tree links
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Tag name (lowercase)
    pub name: String,
    /// Attributes in source order
    pub attrs: Vec<Attribute>,
    /// Cached id attribute (very common lookup)
    pub id: Option<String>,
    /// Cached class list
    pub classes: Vec<String>,
}

impl ElementData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            id: None,
            classes: Vec::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, keeping the id/class caches in sync
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match name {
            "id" => self.id = Some(value.to_string()),
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
            }
            _ => {}
        }

        for attr in self.attrs.iter_mut() {
            if attr.name == name {
                attr.value = value.to_string();
                return;
            }
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// Check for a class in the cached class list
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

impl TextData {
    /// Length in characters, not bytes
    pub fn char_len(&self) -> u32 {
        self.content.chars().count() as u32
    }
}

/// Attribute
#[derive(Debug)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_caches_id_and_class() {
        let mut elem = ElementData::new("div");
        elem.set_attr("id", "sec_1.para_2");
        elem.set_attr("class", "akn-p hoverable");

        assert_eq!(elem.id.as_deref(), Some("sec_1.para_2"));
        assert!(elem.has_class("akn-p"));
        assert!(elem.has_class("hoverable"));
        assert!(!elem.has_class("akn"));
        assert_eq!(elem.get_attr("id"), Some("sec_1.para_2"));
    }

    #[test]
    fn test_set_attr_overwrites() {
        let mut elem = ElementData::new("span");
        elem.set_attr("data-x", "1");
        elem.set_attr("data-x", "2");

        assert_eq!(elem.attrs.len(), 1);
        assert_eq!(elem.get_attr("data-x"), Some("2"));
    }

    #[test]
    fn test_text_char_len() {
        let text = TextData {
            content: "héllo".to_string(),
        };
        assert_eq!(text.char_len(), 5);
    }
}
