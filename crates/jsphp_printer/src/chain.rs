//! Access chains and calls.
//!
//! A read of `a.b[c]` becomes one call to the `dot` helper with the base
//! and every key in order. Calls go through `call_user_func` unless the
//! callee is a bare name that can only be a global function.

use crate::printer::{constant, Helper, Printer};
use jsphp_ast::node::*;

impl Printer {
    /// A variable read, desugaring its chain.
    pub(crate) fn variable(&mut self, variable: &Variable) -> String {
        let base = self.php_variable(&variable.name, variable.scope);
        if variable.is_bare() {
            return base;
        }
        let mut arguments = vec![self.helper(Helper::Dot), base];
        for access in &variable.chain {
            arguments.push(self.access_key(access));
        }
        format!("call_user_func({})", arguments.join(", "))
    }

    /// An assignment target: chains become PHP array writes.
    pub(crate) fn lvalue(&mut self, node: &Node) -> String {
        let Node::Variable(variable) = node else {
            return self.expr(node);
        };
        let mut target = self.php_variable(&variable.name, variable.scope);
        for access in &variable.chain {
            let key = self.access_key(access);
            target.push('[');
            target.push_str(&key);
            target.push(']');
        }
        target
    }

    pub(crate) fn call(&mut self, call: &FunctionCall) -> String {
        let mut arguments: Vec<String> = call.arguments.iter().map(|arg| self.expr(arg)).collect();
        match call.callee.as_ref() {
            Node::Variable(v) if v.is_bare() && !self.is_closure_name(v) => {
                format!("{}({})", v.name, arguments.join(", "))
            }
            callee => {
                arguments.insert(0, self.expr(callee));
                format!("call_user_func({})", arguments.join(", "))
            }
        }
    }

    /// Whether a bare callee names a PHP variable rather than a function.
    fn is_closure_name(&self, variable: &Variable) -> bool {
        variable.scope.is_some() || variable.name.starts_with('$') || self.is_callable_name(&variable.name)
    }

    fn access_key(&mut self, access: &Access) -> String {
        match access {
            Access::Property(key) => constant(key),
            Access::Index(index) => self.expr(index),
        }
    }
}
