//! Free variables of function literals.
//!
//! PHP closures see nothing of the enclosing scope unless it is listed in
//! `use`. A function captures, by reference, every variable it reads or
//! writes that is not `this`, not one of its parameters (or those of a
//! nested function around the use), and not declared in a block inside it.

use indexmap::IndexSet;
use jsphp_ast::node::*;
use jsphp_ast::scope::ScopeId;
use jsphp_ast::visitor::{walk_block, walk_node, walk_variable, NodeVisitor};
use rustc_hash::FxHashSet;

pub(crate) type Capture = (String, Option<ScopeId>);

/// The name bound by a parameter: `a` or `a = default`.
pub(crate) fn parameter_name(node: &Node) -> Option<(&str, Option<ScopeId>)> {
    let variable = match node {
        Node::Variable(v) => v,
        Node::Assignation(a) => a.target.as_variable()?,
        _ => return None,
    };
    variable.is_bare().then_some((variable.name.as_str(), variable.scope))
}

/// Variables `function` must capture, in first-use order. Bare callees for
/// which `is_callable` is false are global function names, not captures.
pub(crate) fn free_variables(function: &Block, is_callable: impl Fn(&str) -> bool) -> IndexSet<Capture> {
    let mut inner = ScopeCollector::default();
    inner.visit_block(function);

    let mut collector = CaptureCollector {
        inner_scopes: inner.scopes,
        parameters: Vec::new(),
        is_callable: &is_callable,
        captures: IndexSet::new(),
    };
    collector.enter_function(function);
    collector.captures
}

/// Every scope owned by a block inside (and including) the visited one.
#[derive(Default)]
struct ScopeCollector {
    scopes: FxHashSet<ScopeId>,
}

impl NodeVisitor for ScopeCollector {
    fn visit_block(&mut self, node: &Block) {
        self.scopes.insert(node.scope);
        walk_block(self, node);
    }
}

struct CaptureCollector<'a> {
    inner_scopes: FxHashSet<ScopeId>,
    /// Parameter names of the function literals around the current node.
    parameters: Vec<FxHashSet<String>>,
    is_callable: &'a dyn Fn(&str) -> bool,
    captures: IndexSet<Capture>,
}

impl CaptureCollector<'_> {
    fn enter_function(&mut self, function: &Block) {
        let names = function
            .parameters()
            .iter()
            .filter_map(parameter_name)
            .map(|(name, _)| name.to_string())
            .collect();
        self.parameters.push(names);
        // Default values are evaluated where the function is defined.
        for parameter in function.parameters() {
            if let Node::Assignation(a) = parameter {
                self.visit_node(&a.value);
            }
        }
        for stmt in &function.body {
            self.visit_node(stmt);
        }
        self.parameters.pop();
    }

    fn is_bound(&self, variable: &Variable) -> bool {
        variable.name == "this"
            || variable.scope.is_some_and(|scope| self.inner_scopes.contains(&scope))
            || self.parameters.iter().any(|names| names.contains(&variable.name))
    }
}

impl NodeVisitor for CaptureCollector<'_> {
    fn visit_node(&mut self, node: &Node) {
        match node {
            Node::FunctionCall(call) => {
                match call.callee.as_variable() {
                    Some(v) if v.is_bare() && v.scope.is_none() && !(self.is_callable)(&v.name) => {}
                    _ => self.visit_node(&call.callee),
                }
                for argument in &call.arguments {
                    self.visit_node(argument);
                }
            }
            _ => walk_node(self, node),
        }
    }

    fn visit_variable(&mut self, node: &Variable) {
        if !self.is_bound(node) {
            self.captures.insert((node.name.clone(), node.scope));
        }
        walk_variable(self, node);
    }

    fn visit_block(&mut self, node: &Block) {
        if node.kind == BlockKind::Function {
            self.enter_function(node);
        } else {
            walk_block(self, node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsphp_core::text::TextSpan;

    fn var(name: &str, scope: Option<u32>) -> Node {
        Node::Variable(Variable::new(name, vec![], TextSpan::default()).with_scope(scope.map(ScopeId)))
    }

    fn function(scope: u32, parameters: Vec<Node>, body: Vec<Node>) -> Block {
        let mut block = Block::new(BlockKind::Function, ScopeId(scope), TextSpan::default());
        block.header = Some(Box::new(Node::Parenthesis(Parenthesis {
            items: parameters,
            ..Default::default()
        })));
        block.body = body;
        block
    }

    #[test]
    fn test_parameters_and_this_are_not_captured() {
        let body = vec![
            Node::Dyiade(Dyiade::new("+", var("a", None), var("b", None))),
            var("this", None),
            var("a", None),
        ];
        let f = function(1, vec![var("a", None)], body);
        let captures: Vec<_> = free_variables(&f, |_| false).into_iter().collect();
        assert_eq!(captures, vec![("b".to_string(), None)]);
    }

    #[test]
    fn test_locals_declared_inside_are_not_captured() {
        let body = vec![var("inner", Some(1)), var("outer", Some(0))];
        let f = function(1, vec![], body);
        let captures: Vec<_> = free_variables(&f, |_| false).into_iter().collect();
        assert_eq!(captures, vec![("outer".to_string(), Some(ScopeId(0)))]);
    }

    #[test]
    fn test_nested_function_free_variables_are_merged() {
        let nested = function(2, vec![var("x", None)], vec![var("x", None), var("y", None)]);
        let f = function(1, vec![], vec![Node::Block(nested)]);
        let captures: Vec<_> = free_variables(&f, |_| false).into_iter().collect();
        assert_eq!(captures, vec![("y".to_string(), None)]);
    }

    #[test]
    fn test_global_function_names_are_not_captured() {
        let call = |callee: &str| {
            Node::FunctionCall(FunctionCall::new(var(callee, None), vec![var("v", None)], TextSpan::default()))
        };
        let f = function(1, vec![], vec![call("strlen"), call("helper")]);
        let captures: Vec<_> = free_variables(&f, |name| name == "helper").into_iter().collect();
        assert_eq!(
            captures,
            vec![("v".to_string(), None), ("helper".to_string(), None)]
        );
    }
}
