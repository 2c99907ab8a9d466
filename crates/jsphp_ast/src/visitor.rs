//! AST visitor trait for traversing the syntax tree.
//!
//! Default implementations walk into children in source order; override a
//! method and call the matching `walk_*` function to keep descending.

use crate::node::*;

pub trait NodeVisitor {
    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_variable(&mut self, node: &Variable) {
        walk_variable(self, node);
    }

    fn visit_block(&mut self, node: &Block) {
        walk_block(self, node);
    }

    fn visit_constant(&mut self, _node: &Constant) {}
}

pub fn walk_node<V: NodeVisitor + ?Sized>(visitor: &mut V, node: &Node) {
    match node {
        Node::Constant(n) => visitor.visit_constant(n),
        Node::Variable(n) => visitor.visit_variable(n),
        Node::Dyiade(n) => {
            visitor.visit_node(&n.left);
            visitor.visit_node(&n.right);
        }
        Node::Ternary(n) => {
            visitor.visit_node(&n.condition);
            visitor.visit_node(&n.then_value);
            visitor.visit_node(&n.else_value);
        }
        Node::Assignation(n) => {
            visitor.visit_node(&n.target);
            visitor.visit_node(&n.value);
        }
        Node::FunctionCall(n) => {
            visitor.visit_node(&n.callee);
            for arg in &n.arguments {
                visitor.visit_node(arg);
            }
        }
        Node::Parenthesis(n) => {
            for item in &n.items {
                visitor.visit_node(item);
            }
        }
        Node::OrderedArray(n) => {
            for item in &n.items {
                visitor.visit_node(item);
            }
        }
        Node::KeyedArray(n) => {
            for (key, value) in &n.entries {
                visitor.visit_constant(key);
                visitor.visit_node(value);
            }
        }
        Node::Unary(n) => visitor.visit_node(&n.operand),
        Node::Block(n) => visitor.visit_block(n),
    }
}

pub fn walk_variable<V: NodeVisitor + ?Sized>(visitor: &mut V, node: &Variable) {
    for access in &node.chain {
        match access {
            Access::Property(key) => visitor.visit_constant(key),
            Access::Index(index) => visitor.visit_node(index),
        }
    }
}

pub fn walk_block<V: NodeVisitor + ?Sized>(visitor: &mut V, node: &Block) {
    if let Some(header) = &node.header {
        visitor.visit_node(header);
    }
    for stmt in &node.body {
        visitor.visit_node(stmt);
    }
}

/// Collect every variable reachable from `node`, in source order.
pub fn collect_variables(node: &Node) -> Vec<&Variable> {
    // Walks manually so the collected references keep the tree lifetime.
    fn collect<'a>(node: &'a Node, out: &mut Vec<&'a Variable>) {
        match node {
            Node::Constant(_) => {}
            Node::Variable(v) => {
                out.push(v);
                for access in &v.chain {
                    if let Access::Index(index) = access {
                        collect(index, out);
                    }
                }
            }
            Node::Dyiade(n) => {
                collect(&n.left, out);
                collect(&n.right, out);
            }
            Node::Ternary(n) => {
                collect(&n.condition, out);
                collect(&n.then_value, out);
                collect(&n.else_value, out);
            }
            Node::Assignation(n) => {
                collect(&n.target, out);
                collect(&n.value, out);
            }
            Node::FunctionCall(n) => {
                collect(&n.callee, out);
                n.arguments.iter().for_each(|arg| collect(arg, out));
            }
            Node::Parenthesis(n) => n.items.iter().for_each(|item| collect(item, out)),
            Node::OrderedArray(n) => n.items.iter().for_each(|item| collect(item, out)),
            Node::KeyedArray(n) => n.entries.iter().for_each(|(_, value)| collect(value, out)),
            Node::Unary(n) => collect(&n.operand, out),
            Node::Block(n) => {
                if let Some(header) = &n.header {
                    collect(header, out);
                }
                n.body.iter().for_each(|stmt| collect(stmt, out));
            }
        }
    }

    let mut out = Vec::new();
    collect(node, &mut out);
    out
}
