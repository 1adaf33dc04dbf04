//! Arena-backed XML document model
//!
//! Elements live in a single `Vec` owned by the [`Document`] and refer to
//! each other through [`NodeId`] indices. A parent owns its child chain;
//! siblings are linked through `next_sibling` and children are reached
//! through `first_child`, so a whole subtree can be walked without any
//! shared ownership.

use indexmap::IndexMap;

/// Index of a node inside its [`Document`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// XML element
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    name: String,
    attributes: IndexMap<String, String>,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl Node {
    fn new(name: String, attributes: IndexMap<String, String>, parent: Option<NodeId>) -> Self {
        Self {
            name,
            attributes,
            parent,
            first_child: None,
            last_child: None,
            next_sibling: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in document order
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.attributes.keys().map(String::as_str)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub const fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub const fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }
}

/// XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create a document holding only its root element
    pub fn new(root_name: impl Into<String>, attributes: IndexMap<String, String>) -> Self {
        Self {
            nodes: vec![Node::new(root_name.into(), attributes, None)],
        }
    }

    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root_node(&self) -> Option<&Node> {
        self.get(self.root())
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of elements in the document
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a new element as the last child of `parent`
    ///
    /// Returns `None` if `parent` does not belong to this document.
    pub fn append_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        attributes: IndexMap<String, String>,
    ) -> Option<NodeId> {
        let previous_last = self.nodes.get(parent.0)?.last_child;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name.into(), attributes, Some(parent)));

        if let Some(prev) = previous_last.and_then(|prev| self.nodes.get_mut(prev.0)) {
            prev.next_sibling = Some(id);
        }
        if let Some(parent_node) = self.nodes.get_mut(parent.0) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = Some(id);
            }
            parent_node.last_child = Some(id);
        }
        Some(id)
    }

    /// Iterate over the direct children of `id`
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            document: self,
            next: self.get(id).and_then(Node::first_child),
        }
    }

    /// The root element if it carries the given tag name
    pub fn root_named(&self, name: &str) -> Option<NodeId> {
        self.root_node()
            .filter(|node| node.name() == name)
            .map(|_| self.root())
    }

    /// Slash-separated tag path from the root down to `id`
    ///
    /// Repeated sibling names get a 1-based position suffix, e.g.
    /// `/Project/Files/File[2]`.
    pub fn path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.get(node_id) else {
                break;
            };
            segments.push(self.segment(node_id, node));
            current = node.parent;
        }

        let mut path = String::new();
        for segment in segments.iter().rev() {
            path.push('/');
            path.push_str(segment);
        }
        path
    }

    fn segment(&self, id: NodeId, node: &Node) -> String {
        let Some(parent) = node.parent else {
            return node.name.clone();
        };

        let mut position = 0usize;
        let mut same_name = 0usize;
        let mut cursor = self.get(parent).and_then(Node::first_child);
        while let Some(sibling_id) = cursor {
            let Some(sibling) = self.get(sibling_id) else {
                break;
            };
            if sibling.name == node.name {
                same_name += 1;
                if sibling_id == id {
                    position = same_name;
                }
            }
            cursor = sibling.next_sibling;
        }

        if same_name > 1 {
            format!("{}[{position}]", node.name)
        } else {
            node.name.clone()
        }
    }
}

/// Iterator over sibling elements
#[derive(Clone, Debug)]
pub struct Children<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.document.get(self.next?)?;
        self.next = node.next_sibling;
        Some(node)
    }
}
