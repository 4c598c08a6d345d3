//! Document arena
//!
//!     A [Document] owns every element of one parse in a flat arena. Elements refer to
//!     each other by [ElementId]; each element stores its parent index inline, so
//!     "who is my parent" needs no global registry and dropping the document releases
//!     the whole tree at once.
//!
//!     Nodes keep two parallel child sequences: all children in insertion order, and
//!     the significant subsequence. Membership in the latter is decided once, when the
//!     child is added. Structures additionally hold their opening and closing brace
//!     tokens in `start`/`finish` slots outside both sequences.

use super::class::{ElementClass, NodeKind, StatementKind, StructureKind};
use super::error::TreeError;
use crate::cst::token::{Attribute, Token, TokenKind};

/// Stable index of an element within its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(usize);

impl ElementId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// Interior node payload
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub attr: Attribute,
    pub children: Vec<ElementId>,
    pub significant: Vec<ElementId>,
    pub start: Option<ElementId>,
    pub finish: Option<ElementId>,
    /// Set when a heredoc token is a direct child; end offsets then need a scan.
    pub has_heredoc: bool,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attr: Attribute::None,
            children: Vec::new(),
            significant: Vec::new(),
            start: None,
            finish: None,
            has_heredoc: false,
        }
    }

    pub fn statement_kind(&self) -> Option<StatementKind> {
        match self.kind {
            NodeKind::Statement(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn structure_kind(&self) -> Option<StructureKind> {
        match self.kind {
            NodeKind::Structure(kind) => Some(kind),
            _ => None,
        }
    }

    /// Null statements are the only insignificant nodes.
    pub fn significant(&self) -> bool {
        self.kind != NodeKind::Statement(StatementKind::Null)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementData {
    Token(Token),
    Node(Node),
}

/// One arena slot
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub parent: Option<ElementId>,
    pub data: ElementData,
}

impl Element {
    pub fn token(&self) -> Option<&Token> {
        match &self.data {
            ElementData::Token(token) => Some(token),
            ElementData::Node(_) => None,
        }
    }

    pub fn node(&self) -> Option<&Node> {
        match &self.data {
            ElementData::Node(node) => Some(node),
            ElementData::Token(_) => None,
        }
    }

    pub fn significant(&self) -> bool {
        match &self.data {
            ElementData::Token(token) => token.significant(),
            ElementData::Node(node) => node.significant(),
        }
    }

    pub fn attr(&self) -> Attribute {
        match &self.data {
            ElementData::Token(token) => token.attr,
            ElementData::Node(node) => node.attr,
        }
    }

    pub fn class(&self) -> ElementClass {
        match &self.data {
            ElementData::Token(token) => ElementClass::Kind(token.kind),
            ElementData::Node(node) => ElementClass::of_node(node.kind),
        }
    }
}

/// The root of a parsed tree and owner of all its elements
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    elements: Vec<Element>,
    source: String,
    tab_width: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document containing only its root node.
    pub fn new() -> Self {
        Self {
            elements: vec![Element {
                parent: None,
                data: ElementData::Node(Node::new(NodeKind::Document)),
            }],
            source: String::new(),
            tab_width: 1,
        }
    }

    /// An empty document for `source`, used by the parser before tokens are added.
    pub fn with_source(source: impl Into<String>, tab_width: usize) -> Self {
        let mut doc = Self::new();
        doc.source = source.into();
        doc.set_tab_width(tab_width);
        doc
    }

    /// The text this document was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> ElementId {
        ElementId::new(0)
    }

    /// Number of elements in the arena, root included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node(self.root())
            .map(|root| root.children.is_empty())
            .unwrap_or(true)
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn set_tab_width(&mut self, tab_width: usize) {
        self.tab_width = tab_width.max(1);
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    pub fn token(&self, id: ElementId) -> Option<&Token> {
        self.get(id)?.token()
    }

    pub fn node(&self, id: ElementId) -> Option<&Node> {
        self.get(id)?.node()
    }

    fn node_mut(&mut self, id: ElementId) -> Result<&mut Node, TreeError> {
        match self.elements.get_mut(id.index()).map(|e| &mut e.data) {
            Some(ElementData::Node(node)) => Ok(node),
            _ => Err(TreeError::NotANode {
                element: id.index(),
            }),
        }
    }

    /// Class of an element; unknown ids report the abstract root class.
    pub fn class(&self, id: ElementId) -> ElementClass {
        self.get(id)
            .map(Element::class)
            .unwrap_or(ElementClass::Element)
    }

    pub fn isa(&self, id: ElementId, class: ElementClass) -> bool {
        self.class(id).isa(class)
    }

    pub fn is_token(&self, id: ElementId) -> bool {
        self.token(id).is_some()
    }

    pub fn token_kind(&self, id: ElementId) -> Option<TokenKind> {
        self.token(id).map(|t| t.kind)
    }

    pub fn statement_kind(&self, id: ElementId) -> Option<StatementKind> {
        self.node(id)?.statement_kind()
    }

    pub fn structure_kind(&self, id: ElementId) -> Option<StructureKind> {
        self.node(id)?.structure_kind()
    }

    pub fn significant(&self, id: ElementId) -> bool {
        self.get(id).map(Element::significant).unwrap_or(false)
    }

    pub fn attribute(&self, id: ElementId) -> Attribute {
        self.get(id).map(Element::attr).unwrap_or_default()
    }

    pub fn set_attribute(&mut self, id: ElementId, attr: Attribute) {
        if let Some(element) = self.elements.get_mut(id.index()) {
            match &mut element.data {
                ElementData::Token(token) => token.attr = attr,
                ElementData::Node(node) => node.attr = attr,
            }
        }
    }

    /// Text of a token, empty for nodes.
    pub fn text(&self, id: ElementId) -> &str {
        self.token(id).map(|t| t.content.as_str()).unwrap_or("")
    }

    // ========================================================================
    // Building
    // ========================================================================

    /// Allocate a detached token.
    pub fn new_token(&mut self, token: Token) -> ElementId {
        self.push(ElementData::Token(token))
    }

    /// Allocate a detached, empty node.
    pub fn new_node(&mut self, kind: NodeKind) -> ElementId {
        self.push(ElementData::Node(Node::new(kind)))
    }

    fn push(&mut self, data: ElementData) -> ElementId {
        let id = ElementId::new(self.elements.len());
        self.elements.push(Element { parent: None, data });
        id
    }

    /// Append `child` to `node`, recording the parent link and significance.
    pub fn add_child(&mut self, node: ElementId, child: ElementId) -> Result<(), TreeError> {
        let (significant, is_heredoc) = match self.get(child) {
            Some(element) => (
                element.significant(),
                element.token().map(|t| t.kind) == Some(TokenKind::HereDoc),
            ),
            None => {
                return Err(TreeError::NotANode {
                    element: child.index(),
                })
            }
        };
        let parent = self.node_mut(node)?;
        parent.children.push(child);
        if significant {
            parent.significant.push(child);
        }
        if is_heredoc {
            parent.has_heredoc = true;
        }
        self.elements[child.index()].parent = Some(node);
        Ok(())
    }

    /// Allocate a token and append it in one step.
    pub fn add_token(&mut self, node: ElementId, token: Token) -> Result<ElementId, TreeError> {
        let id = self.new_token(token);
        self.add_child(node, id)?;
        Ok(id)
    }

    /// Place a brace token in a structure's start slot.
    pub fn set_start(&mut self, structure: ElementId, token: Token) -> Result<ElementId, TreeError> {
        let id = self.new_token(token);
        self.node_mut(structure)?.start = Some(id);
        self.elements[id.index()].parent = Some(structure);
        Ok(id)
    }

    /// Place a brace token in a structure's finish slot.
    pub fn set_finish(&mut self, structure: ElementId, token: Token) -> Result<ElementId, TreeError> {
        let id = self.new_token(token);
        self.node_mut(structure)?.finish = Some(id);
        self.elements[id.index()].parent = Some(structure);
        Ok(id)
    }

    /// Re-tag a provisional statement or structure with its resolved kind.
    ///
    /// Children, their order and their parent links are untouched: the node keeps its
    /// identity and only its kind changes.
    pub fn change_to(&mut self, id: ElementId, kind: NodeKind) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        node.kind = kind;
        Ok(())
    }

    /// Iterate every element id in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        (0..self.elements.len()).map(ElementId::new)
    }
}

impl Document {
    /// Reproduce the source text.
    ///
    /// Tokens are written in order; a heredoc's payload and terminator line are held
    /// back and written right after the first newline that follows the marker.
    pub fn serialize(&self) -> String {
        let mut output = String::with_capacity(self.source.len());
        let mut pending = String::new();
        for id in self.tokens(self.root()) {
            let Some(token) = self.token(id) else {
                continue;
            };
            if let Some(heredoc) = token.heredoc() {
                output.push_str(&token.content);
                pending.push_str(&heredoc.raw_body());
                continue;
            }
            if pending.is_empty() {
                output.push_str(&token.content);
                continue;
            }
            match token.content.split_once('\n') {
                Some((head, tail)) => {
                    output.push_str(head);
                    output.push('\n');
                    output.push_str(&pending);
                    output.push_str(tail);
                    pending.clear();
                }
                None => output.push_str(&token.content),
            }
        }
        if !pending.is_empty() {
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(&pending);
        }
        output
    }
}
