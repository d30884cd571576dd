use std::collections::{BTreeMap, BTreeSet};

/// One element of the rendered surface: identifier, classes, text content,
/// attributes, and vertical geometry for visibility checks.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub id: String,
    pub classes: BTreeSet<String>,
    pub text: String,
    pub attrs: BTreeMap<String, String>,
    pub top: f64,
    pub height: f64,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            ..Node::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn at(mut self, top: f64, height: f64) -> Self {
        self.top = top;
        self.height = height;
        self
    }
}

/// In-memory model of the page the engine mutates. The real markup is an
/// external collaborator; the engine only needs node lookup by id or class,
/// text and attribute writes, and class toggling.
#[derive(Debug, Default)]
pub struct Surface {
    root_attrs: BTreeMap<String, String>,
    nodes: BTreeMap<String, Node>,
}

impl Surface {
    pub fn insert(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.nodes.get(id).map(|node| node.text.clone())
    }

    /// Returns false when the node does not exist.
    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.text = text.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_attr(&mut self, id: &str, name: &str, value: &str) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.attrs.insert(name.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    pub fn attr(&self, id: &str, name: &str) -> Option<String> {
        self.nodes.get(id).and_then(|node| node.attrs.get(name).cloned())
    }

    pub fn add_class(&mut self, id: &str, class: &str) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.classes.insert(class.to_string());
                true
            }
            None => false,
        }
    }

    pub fn remove_class(&mut self, id: &str, class: &str) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.classes.remove(class);
                true
            }
            None => false,
        }
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|node| node.classes.contains(class))
    }

    /// Ids of every node carrying the class, in id order.
    pub fn ids_with_class(&self, class: &str) -> Vec<String> {
        self.nodes
            .values()
            .filter(|node| node.classes.contains(class))
            .map(|node| node.id.clone())
            .collect()
    }

    pub fn geometry(&self, id: &str) -> Option<(f64, f64)> {
        self.nodes.get(id).map(|node| (node.top, node.height))
    }

    pub fn set_root_attr(&mut self, name: &str, value: &str) {
        self.root_attrs.insert(name.to_string(), value.to_string());
    }

    pub fn root_attr(&self, name: &str) -> Option<&str> {
        self.root_attrs.get(name).map(String::as_str)
    }
}
