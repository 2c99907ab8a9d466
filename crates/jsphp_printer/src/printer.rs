//! The printer: statements are written into an output buffer, expressions
//! are built by recursive functions returning their text.

use crate::captures::{free_variables, parameter_name};
use jsphp_ast::node::*;
use jsphp_ast::scope::ScopeId;
use jsphp_ast::visitor::{walk_block, NodeVisitor};
use jsphp_options::CompilerOptions;
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;

/// Options for the printer.
#[derive(Debug, Clone)]
pub struct PrinterOptions {
    /// Prefix of the names given to block-local variables.
    pub var_prefix: String,
    /// Prefix of the runtime helper globals.
    pub helper_prefix: String,
    /// Indentation string.
    pub indent_str: String,
    /// Newline string.
    pub new_line: String,
    /// Whether to emit a trailing newline.
    pub trailing_newline: bool,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self::from(&CompilerOptions::default())
    }
}

impl From<&CompilerOptions> for PrinterOptions {
    fn from(options: &CompilerOptions) -> Self {
        Self {
            var_prefix: options.var_prefix.clone(),
            helper_prefix: options.helper_prefix(),
            indent_str: "    ".to_string(),
            new_line: "\n".to_string(),
            trailing_newline: true,
        }
    }
}

/// A runtime helper referenced by printed code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Helper {
    /// Unified property read, index read and method lookup.
    Dot,
    /// JavaScript `typeof` names for PHP values.
    TypeOf,
}

impl Helper {
    pub fn name(self) -> &'static str {
        match self {
            Helper::Dot => "dot",
            Helper::TypeOf => "typeof",
        }
    }
}

/// The printer converts a main block to PHP text.
pub struct Printer {
    output: String,
    indent_level: u32,
    pub(crate) options: PrinterOptions,
    helpers: BTreeSet<Helper>,
    /// Names bound to closures: named functions of the unit, then the
    /// parameters of each enclosing function literal.
    callables: Vec<FxHashSet<String>>,
}

impl Printer {
    pub fn new(options: PrinterOptions) -> Self {
        Self {
            output: String::with_capacity(4096),
            indent_level: 0,
            options,
            helpers: BTreeSet::new(),
            callables: Vec::new(),
        }
    }

    /// Print the statements of a main block.
    pub fn print_main(&mut self, root: &Block) -> String {
        self.output.clear();
        let mut named = NamedFunctions::default();
        named.visit_block(root);
        self.callables = vec![named.names];

        self.print_statements(&root.body);
        if !self.options.trailing_newline && self.output.ends_with(&self.options.new_line) {
            let len = self.output.len() - self.options.new_line.len();
            self.output.truncate(len);
        }
        std::mem::take(&mut self.output)
    }

    /// Print a single expression.
    pub fn print_expression(&mut self, node: &Node) -> String {
        self.expr(node)
    }

    /// Helpers referenced so far, in a stable order.
    pub fn used_helpers(&self) -> Vec<Helper> {
        self.helpers.iter().copied().collect()
    }

    // ========================================================================
    // Output management
    // ========================================================================

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_newline(&mut self) {
        let new_line = self.options.new_line.clone();
        self.output.push_str(&new_line);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            let indent = self.options.indent_str.clone();
            self.output.push_str(&indent);
        }
    }

    /// Run `f` against an empty buffer and return what it wrote.
    fn capture(&mut self, f: impl FnOnce(&mut Self)) -> String {
        let saved = std::mem::take(&mut self.output);
        f(self);
        std::mem::replace(&mut self.output, saved)
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// `$name`, or `$<prefix>_<scope>_<name>` for block-local names.
    pub(crate) fn php_variable(&self, name: &str, scope: Option<ScopeId>) -> String {
        let bare = name.trim_start_matches('$');
        match scope {
            Some(scope) => format!("${}_{}_{}", self.options.var_prefix, scope, bare),
            None => format!("${}", bare),
        }
    }

    /// A reference to a runtime helper, recorded as used.
    pub(crate) fn helper(&mut self, helper: Helper) -> String {
        self.helpers.insert(helper);
        format!("$GLOBALS['{}{}']", self.options.helper_prefix, helper.name())
    }

    pub(crate) fn is_callable_name(&self, name: &str) -> bool {
        self.callables.iter().any(|names| names.contains(name))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Named function statements are hoisted to the top of their block,
    /// except in `switch` bodies where nothing may precede the first label.
    fn print_statements(&mut self, body: &[Node]) {
        let hoist = !body.iter().any(is_case_label);
        let (declarations, rest): (Vec<&Node>, Vec<&Node>) =
            body.iter().partition(|stmt| hoist && is_named_function(stmt));
        for stmt in declarations.into_iter().chain(rest) {
            self.write_indent();
            self.print_statement(stmt);
            self.write_newline();
        }
    }

    fn print_statement(&mut self, node: &Node) {
        match node {
            Node::Block(block) => self.print_block_statement(block),
            other => {
                let text = self.expr(other);
                self.write(&text);
                self.write(";");
            }
        }
    }

    fn print_braced(&mut self, body: &[Node]) {
        if body.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.write_newline();
        self.indent_level += 1;
        self.print_statements(body);
        self.indent_level -= 1;
        self.write_indent();
        self.write("}");
    }

    fn header(&mut self, block: &Block) -> String {
        match block.header.as_deref() {
            Some(Node::Parenthesis(group)) => self.parenthesis(group),
            Some(other) => format!("({})", self.expr(other)),
            None => "()".to_string(),
        }
    }

    fn print_block_statement(&mut self, block: &Block) {
        match &block.kind {
            BlockKind::Main => self.print_statements(&block.body),
            BlockKind::Function => {
                let literal = self.function_literal(block);
                if let Some(name) = &block.name {
                    let target = self.php_variable(name, None);
                    self.write(&target);
                    self.write(" = ");
                }
                self.write(&literal);
                self.write(";");
            }
            BlockKind::Return | BlockKind::Break | BlockKind::Continue | BlockKind::Throw => {
                self.write(block.kind.keyword());
                if let Some(value) = block.header.as_deref() {
                    let value = self.expr(value);
                    self.write(" ");
                    self.write(&value);
                }
                self.write(";");
            }
            BlockKind::Case => {
                let value = block.header.as_deref().map(|v| self.expr(v)).unwrap_or_default();
                self.write("case ");
                self.write(&value);
                self.write(":");
            }
            BlockKind::Default => self.write("default:"),
            BlockKind::If | BlockKind::While | BlockKind::For | BlockKind::Switch => {
                let header = self.header(block);
                self.write(block.kind.keyword());
                self.write(" ");
                self.write(&header);
                self.write(" ");
                self.print_braced(&block.body);
            }
            BlockKind::Else | BlockKind::Try | BlockKind::Finally => {
                self.write(block.kind.keyword());
                self.write(" ");
                self.print_braced(&block.body);
            }
            BlockKind::Catch => {
                let binding = match block.header.as_deref() {
                    Some(Node::Parenthesis(group)) => group
                        .items
                        .first()
                        .and_then(parameter_name)
                        .map(|(name, scope)| format!(" {}", self.php_variable(name, scope)))
                        .unwrap_or_default(),
                    _ => String::new(),
                };
                self.write(&format!("catch (\\Throwable{}) ", binding));
                self.print_braced(&block.body);
            }
            BlockKind::Do => {
                let condition = match block.header {
                    Some(_) => self.header(block),
                    None => "(false)".to_string(),
                };
                self.write("do ");
                self.print_braced(&block.body);
                self.write(" while ");
                self.write(&condition);
                self.write(";");
            }
            BlockKind::Keyword(name) => {
                self.write(name);
                if block.header.is_some() {
                    let header = self.header(block);
                    self.write(" ");
                    self.write(&header);
                }
                if block.delimited {
                    self.write(" ");
                    self.print_braced(&block.body);
                } else if let Some(stmt) = block.body.first() {
                    self.write(" ");
                    self.print_statement(stmt);
                } else {
                    self.write(";");
                }
            }
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub(crate) fn expr(&mut self, node: &Node) -> String {
        match node {
            Node::Constant(c) => constant(c),
            Node::Variable(v) => self.variable(v),
            Node::Dyiade(n) => {
                let left = self.expr(&n.left);
                let right = self.expr(&n.right);
                format!("{} {} {}", left, n.operator, right)
            }
            Node::Ternary(n) => {
                let condition = self.expr(&n.condition);
                let then_value = self.ternary_branch(&n.then_value);
                let else_value = self.ternary_branch(&n.else_value);
                format!("{} ? {} : {}", condition, then_value, else_value)
            }
            Node::Assignation(n) => {
                let target = self.lvalue(&n.target);
                let value = self.expr(&n.value);
                format!("{} {} {}", target, n.operator, value)
            }
            Node::FunctionCall(n) => self.call(n),
            Node::Parenthesis(n) => self.parenthesis(n),
            Node::OrderedArray(n) => {
                let items: Vec<String> = n
                    .entries()
                    .map(|(key, value)| format!("{} => {}", key, self.expr(value)))
                    .collect();
                format!("[{}]", items.join(", "))
            }
            Node::KeyedArray(n) => {
                let items: Vec<String> = n
                    .entries
                    .iter()
                    .map(|(key, value)| format!("{} => {}", constant(key), self.expr(value)))
                    .collect();
                format!("[{}]", items.join(", "))
            }
            Node::Unary(n) => self.unary(n),
            Node::Block(block) if block.kind == BlockKind::Function => self.function_literal(block),
            Node::Block(block) => self.capture(|p| p.print_block_statement(block)),
        }
    }

    /// PHP refuses an unparenthesized ternary nested in a branch, including
    /// one reached through the right operand of an operator.
    fn ternary_branch(&mut self, node: &Node) -> String {
        let text = self.expr(node);
        if ends_in_ternary(node) {
            format!("({})", text)
        } else {
            text
        }
    }

    fn parenthesis(&mut self, group: &Parenthesis) -> String {
        let items: Vec<String> = group.items.iter().map(|item| self.expr(item)).collect();
        format!("({})", items.join(group.separator.as_str()))
    }

    fn unary(&mut self, unary: &Unary) -> String {
        match (unary.operator.as_str(), unary.fixity) {
            ("typeof", _) => {
                let operand = self.expr(&unary.operand);
                format!("call_user_func({}, {})", self.helper(Helper::TypeOf), operand)
            }
            ("void", _) => format!("({} ? null : null)", self.expr(&unary.operand)),
            ("delete", _) => format!("unset({})", self.lvalue(&unary.operand)),
            (op @ ("++" | "--"), Fixity::Prefix) => format!("{}{}", op, self.lvalue(&unary.operand)),
            (op, Fixity::Postfix) => format!("{}{}", self.lvalue(&unary.operand), op),
            (op, Fixity::Prefix) => {
                let operand = self.expr(&unary.operand);
                // `- -a` must not print as `--a`.
                let glued = operand.starts_with(['-', '+']) && op.ends_with(['-', '+']);
                let space = if glued { " " } else { "" };
                format!("{}{}{}", op, space, operand)
            }
        }
    }

    /// `function ($a) use (&$b) { ... }`
    fn function_literal(&mut self, function: &Block) -> String {
        let parameters: Vec<String> = function.parameters().iter().map(|p| self.parameter(p)).collect();
        let free = free_variables(function, |name| self.is_callable_name(name));
        let captures: Vec<String> = free
            .iter()
            .map(|(name, scope)| format!("&{}", self.php_variable(name, *scope)))
            .collect();

        let names = function
            .parameters()
            .iter()
            .filter_map(parameter_name)
            .map(|(name, _)| name.to_string())
            .collect();
        self.callables.push(names);
        let text = self.capture(|p| {
            p.write(&format!("function ({})", parameters.join(", ")));
            if !captures.is_empty() {
                p.write(&format!(" use ({})", captures.join(", ")));
            }
            p.write(" ");
            p.print_braced(&function.body);
        });
        self.callables.pop();
        text
    }

    fn parameter(&mut self, node: &Node) -> String {
        match node {
            Node::Variable(v) => self.php_variable(&v.name, v.scope),
            Node::Assignation(a) => {
                let target = self.lvalue(&a.target);
                let default = self.expr(&a.value);
                format!("{} = {}", target, default)
            }
            other => self.expr(other),
        }
    }
}

/// Collects the names bound by named function statements.
#[derive(Default)]
struct NamedFunctions {
    names: FxHashSet<String>,
}

impl NodeVisitor for NamedFunctions {
    fn visit_block(&mut self, node: &Block) {
        if let Some(name) = &node.name {
            self.names.insert(name.clone());
        }
        walk_block(self, node);
    }
}

fn is_named_function(node: &Node) -> bool {
    matches!(node, Node::Block(b) if b.kind == BlockKind::Function && b.name.is_some())
}

fn is_case_label(node: &Node) -> bool {
    matches!(node, Node::Block(b) if matches!(b.kind, BlockKind::Case | BlockKind::Default))
}

/// Whether `node` prints with a ternary as its last operand.
fn ends_in_ternary(node: &Node) -> bool {
    match node {
        Node::Ternary(_) => true,
        Node::Dyiade(n) => ends_in_ternary(&n.right),
        Node::Assignation(n) => ends_in_ternary(&n.value),
        Node::Unary(n) if n.fixity == Fixity::Prefix => ends_in_ternary(&n.operand),
        _ => false,
    }
}

/// A literal as PHP source.
pub(crate) fn constant(c: &Constant) -> String {
    match c.kind {
        ConstantKind::Constant => c.value.clone(),
        ConstantKind::Number => number(&c.value),
        ConstantKind::String => string(&c.value),
    }
}

fn number(value: &str) -> String {
    match value.strip_prefix("0o").or_else(|| value.strip_prefix("0O")) {
        Some(digits) => format!("0{}", digits),
        None => value.to_string(),
    }
}

/// Quoted string literal as PHP source. Single-quoted literals without
/// escapes are kept; others become double-quoted with `$` escaped.
fn string(literal: &str) -> String {
    let (quote, inner) = match literal.chars().next() {
        Some(q @ ('\'' | '"')) if literal.len() >= 2 => (q, &literal[1..literal.len() - 1]),
        _ => return literal.to_string(),
    };
    let needs_double = quote == '"' || has_escape_other_than_quote(inner);
    if !needs_double {
        return literal.to_string();
    }
    let mut out = String::with_capacity(literal.len() + 2);
    out.push('"');
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\'') => out.push('\''),
                Some('u') if !chars.as_str().starts_with('{') => {
                    // PHP only knows the braced `\u{...}` form.
                    let digits: String = chars.as_str().chars().take(4).take_while(char::is_ascii_hexdigit).collect();
                    if digits.len() == 4 {
                        chars.nth(3);
                        out.push_str(&format!("\\u{{{}}}", digits));
                    } else {
                        out.push_str("\\u");
                    }
                }
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push_str("\\\\"),
            },
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn has_escape_other_than_quote(inner: &str) -> bool {
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' && !matches!(chars.next(), Some('\'') | Some('\\')) {
            return true;
        }
    }
    false
}
