//! The parse tree: an arena of nodes addressed by [`NodeId`], built by an
//! explicit stack of open rules rather than a cursor that aliases the tree
//! itself.

use nanoc_lex::Token;
use nanoc_util::index_vec::IndexVec;
use nanoc_util::define_idx;

define_idx!(NodeId);

/// One parse-tree node: a grammar-rule label or a leaf token, plus its
/// children in source order. A node is a leaf iff `token.is_some()`; leaves
/// never acquire children.
#[derive(Debug, Clone)]
pub struct Node {
    pub label: &'static str,
    pub token: Option<Token>,
    pub children: Vec<NodeId>,
}

/// Builds the tree as the parser descends. `begin_rule` pushes a new,
/// still-open node as a child of whatever is currently open (or as the root,
/// the first time it's called); `end_rule` closes it. Because the stack is
/// separate from the arena, an error partway through a rule leaves the tree
/// exactly as far as parsing got, with no dangling cursor to rewind.
pub struct TreeBuilder {
    nodes: IndexVec<NodeId, Node>,
    open: Vec<NodeId>,
    root: Option<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder {
            nodes: IndexVec::new(),
            open: Vec::new(),
            root: None,
        }
    }

    /// Opens a new node labeled `label`, linking it as a child of the
    /// current top-of-stack node (or recording it as the tree root if
    /// nothing is open yet). Returns the new node's id; pair with
    /// [`end_rule`](Self::end_rule).
    pub fn begin_rule(&mut self, label: &'static str) -> NodeId {
        let id = self.nodes.push(Node {
            label,
            token: None,
            children: Vec::new(),
        });
        if let Some(&parent) = self.open.last() {
            self.nodes[parent].children.push(id);
        } else if self.root.is_none() {
            self.root = Some(id);
        }
        self.open.push(id);
        id
    }

    /// Closes the node most recently opened by `begin_rule`.
    pub fn end_rule(&mut self) {
        self.open.pop();
    }

    /// Attaches `token` as a leaf child of the currently open node.
    pub fn push_token(&mut self, label: &'static str, token: Token) {
        let id = self.nodes.push(Node {
            label,
            token: Some(token),
            children: Vec::new(),
        });
        if let Some(&parent) = self.open.last() {
            self.nodes[parent].children.push(id);
        }
    }

    /// Finishes the tree, discarding the builder. Panics if any rule is
    /// still open or the root was never created — both are parser bugs, not
    /// user-triggerable states.
    pub fn finish(self) -> ParseTree {
        assert!(self.open.is_empty(), "tree builder finished with open rules");
        let root = self.root.expect("tree builder finished with no root");
        ParseTree {
            nodes: self.nodes,
            root,
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The finished parse tree: an arena plus the id of its root.
pub struct ParseTree {
    nodes: IndexVec<NodeId, Node>,
    root: NodeId,
}

impl ParseTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Renders the tree per the driver's pretty-print contract: indented,
    /// one node per line, root-first, children in source order; a leaf that
    /// carries a token appends `[lexeme]` to its label.
    pub fn pretty_print(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root, 0, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = &self.nodes[id];
        out.push_str(&"  ".repeat(depth));
        out.push_str(node.label);
        if let Some(token) = &node.token {
            out.push('[');
            out.push_str(&token.lexeme);
            out.push(']');
        }
        out.push('\n');
        for &child in &node.children {
            self.write_node(child, depth + 1, out);
        }
    }
}
