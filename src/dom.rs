use std::collections::HashMap;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A file handed to an `<input type="file">` by the simulation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub mime_type: String,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) files: Vec<FileUpload>,
}

impl Element {
    pub(crate) fn new(tag_name: String, attrs: HashMap<String, String>) -> Self {
        let value = attrs.get("value").cloned().unwrap_or_default();
        Self {
            tag_name,
            attrs,
            value,
            files: Vec::new(),
        }
    }

    pub(crate) fn class_tokens(&self) -> Vec<&str> {
        self.attrs
            .get("class")
            .map(|list| list.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.class_tokens().iter().any(|token| *token == class)
    }
}

/// Arena document: nodes never move, removal detaches a subtree and leaves
/// its slots behind. `NodeId`s into a replaced subtree are stale and must
/// not be reused by callers.
#[derive(Debug, Clone)]
pub struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let element = Element::new(tag_name, attrs);
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = self
            .element(id)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            self.id_index.insert(id_attr, id);
        }
        id
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn expect_element(&self, node_id: NodeId) -> Result<&Element> {
        self.element(node_id)
            .ok_or_else(|| Error::DomMisuse("node is not an element".into()))
    }

    pub(crate) fn expect_element_mut(&mut self, node_id: NodeId) -> Result<&mut Element> {
        self.element_mut(node_id)
            .ok_or_else(|| Error::DomMisuse("node is not an element".into()))
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes[node_id.0].parent
    }

    pub(crate) fn children(&self, node_id: NodeId) -> &[NodeId] {
        &self.nodes[node_id.0].children
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub(crate) fn attr(&self, node_id: NodeId, key: &str) -> Option<&str> {
        self.element(node_id)
            .and_then(|element| element.attrs.get(key))
            .map(String::as_str)
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, key: &str, value: &str) -> Result<()> {
        let element = self.expect_element_mut(node_id)?;
        element.attrs.insert(key.to_string(), value.to_string());
        if key == "id" {
            self.id_index.insert(value.to_string(), node_id);
        }
        Ok(())
    }

    pub(crate) fn remove_attr(&mut self, node_id: NodeId, key: &str) -> Result<()> {
        let removed = self.expect_element_mut(node_id)?.attrs.remove(key);
        if key == "id" {
            if let Some(old) = removed {
                self.id_index.remove(&old);
            }
        }
        Ok(())
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<&str> {
        Ok(self.expect_element(node_id)?.value.as_str())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        self.expect_element_mut(node_id)?.value = value.to_string();
        Ok(())
    }

    pub(crate) fn files(&self, node_id: NodeId) -> Result<&[FileUpload]> {
        Ok(self.expect_element(node_id)?.files.as_slice())
    }

    pub(crate) fn set_files(&mut self, node_id: NodeId, files: Vec<FileUpload>) -> Result<()> {
        self.expect_element_mut(node_id)?.files = files;
        Ok(())
    }

    pub(crate) fn has_class(&self, node_id: NodeId, class: &str) -> bool {
        self.element(node_id)
            .map(|element| element.has_class(class))
            .unwrap_or(false)
    }

    pub(crate) fn add_class(&mut self, node_id: NodeId, class: &str) -> Result<()> {
        let element = self.expect_element_mut(node_id)?;
        if element.has_class(class) {
            return Ok(());
        }
        let mut list = element.attrs.get("class").cloned().unwrap_or_default();
        if !list.is_empty() {
            list.push(' ');
        }
        list.push_str(class);
        element.attrs.insert("class".into(), list);
        Ok(())
    }

    pub(crate) fn remove_class(&mut self, node_id: NodeId, class: &str) -> Result<()> {
        let element = self.expect_element_mut(node_id)?;
        let kept = element
            .class_tokens()
            .into_iter()
            .filter(|token| *token != class)
            .collect::<Vec<_>>()
            .join(" ");
        element.attrs.insert("class".into(), kept);
        Ok(())
    }

    pub(crate) fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document | NodeType::Element(_) => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
        }
    }

    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        self.expect_element(node_id)?;
        self.detach_children(node_id);
        if !value.is_empty() {
            self.create_text(node_id, value.to_string());
        }
        Ok(())
    }

    pub(crate) fn detach_children(&mut self, node_id: NodeId) {
        let children = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in children {
            self.drop_from_id_index(child);
            self.nodes[child.0].parent = None;
        }
    }

    fn drop_from_id_index(&mut self, node_id: NodeId) {
        if let Some(id_attr) = self
            .element(node_id)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            if self.id_index.get(&id_attr) == Some(&node_id) {
                self.id_index.remove(&id_attr);
            }
        }
        let children = self.nodes[node_id.0].children.clone();
        for child in children {
            self.drop_from_id_index(child);
        }
    }

    /// Re-registers ids under `node_id` after a subtree was parsed in.
    pub(crate) fn reindex_ids(&mut self, node_id: NodeId) {
        if let Some(id_attr) = self
            .element(node_id)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            self.id_index.insert(id_attr, node_id);
        }
        let children = self.nodes[node_id.0].children.clone();
        for child in children {
            self.reindex_ids(child);
        }
    }

    /// Depth-first walk over elements attached under `start`, in document order.
    pub(crate) fn walk_elements(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = self
            .children(start)
            .iter()
            .rev()
            .copied()
            .collect::<Vec<_>>();
        while let Some(node) = stack.pop() {
            if self.element(node).is_some() {
                out.push(node);
            }
            for child in self.children(node).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Text nodes attached under `start`, in document order.
    pub(crate) fn walk_texts(&self, start: NodeId) -> Vec<(NodeId, String)> {
        let mut out = Vec::new();
        let mut stack = self
            .children(start)
            .iter()
            .rev()
            .copied()
            .collect::<Vec<_>>();
        while let Some(node) = stack.pop() {
            if let NodeType::Text(text) = &self.nodes[node.0].node_type {
                out.push((node, text.clone()));
            }
            for child in self.children(node).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
            NodeType::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                let mut keys = element.attrs.keys().collect::<Vec<_>>();
                keys.sort();
                for key in keys {
                    out.push_str(&format!(" {key}=\"{}\"", element.attrs[key]));
                }
                out.push('>');
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out.push_str(&format!("</{}>", element.tag_name));
                out
            }
        }
    }

    /// Short snippet of an element for assertion messages.
    pub(crate) fn snippet(&self, node_id: NodeId) -> String {
        let mut dump = self.dump_node(node_id);
        if dump.len() > 160 {
            let mut cut = 160;
            while !dump.is_char_boundary(cut) {
                cut -= 1;
            }
            dump.truncate(cut);
            dump.push_str("...");
        }
        dump
    }
}
