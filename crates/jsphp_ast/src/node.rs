//! AST node definitions.
//!
//! The tree is exclusively owned: every node owns its children and there
//! are no cycles. The only cross-reference is [`Variable::scope`], an index
//! into the unit's [`ScopeTable`](crate::scope::ScopeTable).
//!
//! Binary nodes record encounter order, not precedence. Printing them back
//! in the same left-to-right order lets the host language apply its own
//! precedence rules to the output.

use crate::scope::ScopeId;
use jsphp_core::text::TextSpan;

// ============================================================================
// Node
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Constant(Constant),
    Variable(Variable),
    Dyiade(Dyiade),
    Ternary(Ternary),
    Assignation(Assignation),
    FunctionCall(FunctionCall),
    Parenthesis(Parenthesis),
    OrderedArray(OrderedArray),
    KeyedArray(KeyedArray),
    Unary(Unary),
    Block(Block),
}

impl Node {
    pub fn span(&self) -> TextSpan {
        match self {
            Node::Constant(n) => n.span,
            Node::Variable(n) => n.span,
            Node::Dyiade(n) => n.span,
            Node::Ternary(n) => n.span,
            Node::Assignation(n) => n.span,
            Node::FunctionCall(n) => n.span,
            Node::Parenthesis(n) => n.span,
            Node::OrderedArray(n) => n.span,
            Node::KeyedArray(n) => n.span,
            Node::Unary(n) => n.span,
            Node::Block(n) => n.span,
        }
    }

    /// Short human-readable description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Node::Constant(n) => format!("{} {}", n.kind.name(), n.value),
            Node::Variable(n) => format!("variable {}", n.name),
            Node::Dyiade(n) => format!("'{}' expression", n.operator),
            Node::Ternary(_) => "ternary expression".to_string(),
            Node::Assignation(_) => "assignation".to_string(),
            Node::FunctionCall(_) => "function call".to_string(),
            Node::Parenthesis(_) => "parenthesis".to_string(),
            Node::OrderedArray(_) | Node::KeyedArray(_) => "array literal".to_string(),
            Node::Unary(n) => format!("'{}' expression", n.operator),
            Node::Block(n) => format!("{} block", n.kind.keyword()),
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Node::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(b) => Some(b),
            _ => None,
        }
    }
}

// ============================================================================
// Assignable
// ============================================================================

/// The capability of appearing on the left-hand side of an assignment.
pub trait Assignable {
    fn is_assignable(&self) -> bool;

    /// Why this node cannot be assigned, for diagnostics.
    fn non_assignable_reason(&self) -> String;
}

impl Assignable for Node {
    fn is_assignable(&self) -> bool {
        matches!(self, Node::Variable(_))
    }

    fn non_assignable_reason(&self) -> String {
        let description = self.describe();
        let mut chars = description.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => description,
        }
    }
}

// ============================================================================
// Leaves
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantKind {
    /// A named constant, already translated (`INF`, `null`, `M_PI`).
    Constant,
    Number,
    /// A quoted string literal, quotes included.
    String,
}

impl ConstantKind {
    pub fn name(self) -> &'static str {
        match self {
            ConstantKind::Constant => "constant",
            ConstantKind::Number => "number",
            ConstantKind::String => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub kind: ConstantKind,
    pub value: String,
    pub span: TextSpan,
}

impl Constant {
    pub fn new(kind: ConstantKind, value: impl Into<String>, span: TextSpan) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    /// A single-quoted string literal holding `text`.
    pub fn quoted(text: &str, span: TextSpan) -> Self {
        let escaped = text.replace('\\', "\\\\").replace('\'', "\\'");
        Self::new(ConstantKind::String, format!("'{}'", escaped), span)
    }
}

/// One step of an access chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    /// `.name`, keyed by a literal string.
    Property(Constant),
    /// `[expr]`, keyed by an arbitrary expression.
    Index(Node),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub chain: Vec<Access>,
    /// The block scope that declared `name` via `let`/`const`, if any.
    pub scope: Option<ScopeId>,
    pub span: TextSpan,
}

impl Variable {
    pub fn new(name: impl Into<String>, chain: Vec<Access>, span: TextSpan) -> Self {
        Self {
            name: name.into(),
            chain,
            scope: None,
            span,
        }
    }

    pub fn with_scope(mut self, scope: Option<ScopeId>) -> Self {
        self.scope = scope;
        self
    }

    #[inline]
    pub fn is_bare(&self) -> bool {
        self.chain.is_empty()
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Dyiade {
    pub operator: String,
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub span: TextSpan,
}

impl Dyiade {
    pub fn new(operator: impl Into<String>, left: Node, right: Node) -> Self {
        let span = left.span().union(&right.span());
        Self {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ternary {
    pub condition: Box<Node>,
    pub then_value: Box<Node>,
    pub else_value: Box<Node>,
    pub span: TextSpan,
}

impl Ternary {
    pub fn new(condition: Node, then_value: Node, else_value: Node) -> Self {
        let span = condition.span().union(&else_value.span());
        Self {
            condition: Box::new(condition),
            then_value: Box::new(then_value),
            else_value: Box::new(else_value),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignation {
    pub operator: String,
    pub target: Box<Node>,
    pub value: Box<Node>,
    pub span: TextSpan,
}

impl Assignation {
    /// Build an assignation, refusing targets that are not [`Assignable`].
    /// On refusal the target is handed back with the reason.
    pub fn new(operator: impl Into<String>, target: Node, value: Node) -> Result<Self, (Node, String)> {
        if !target.is_assignable() {
            let reason = target.non_assignable_reason();
            return Err((target, reason));
        }
        let span = target.span().union(&value.span());
        Ok(Self {
            operator: operator.into(),
            target: Box::new(target),
            value: Box::new(value),
            span,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub callee: Box<Node>,
    pub arguments: Vec<Node>,
    pub span: TextSpan,
}

impl FunctionCall {
    pub fn new(callee: Node, arguments: Vec<Node>, end: TextSpan) -> Self {
        let span = callee.span().union(&end);
        Self {
            callee: Box::new(callee),
            arguments,
            span,
        }
    }
}

/// The separator used between the items of a parenthesized group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Comma,
    /// `for (init; test; update)` headers.
    Semicolon,
}

impl Separator {
    pub fn as_str(self) -> &'static str {
        match self {
            Separator::Comma => ", ",
            Separator::Semicolon => "; ",
        }
    }
}

/// A grouped expression list or a parameter list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parenthesis {
    pub items: Vec<Node>,
    pub separator: Separator,
    pub span: TextSpan,
}

/// `[a, b]`: keys are positional, assigned from zero at emission.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedArray {
    pub items: Vec<Node>,
    pub span: TextSpan,
}

impl OrderedArray {
    /// Items paired with their implicit positional key.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.items.iter().enumerate()
    }
}

/// `{key: value}`: explicit keys, kept in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedArray {
    pub entries: Vec<(Constant, Node)>,
    pub span: TextSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    Prefix,
    Postfix,
}

/// A unary operator application: `!a`, `typeof a`, `a++`.
#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: String,
    pub operand: Box<Node>,
    pub fixity: Fixity,
    pub span: TextSpan,
}

impl Unary {
    pub fn new(operator: impl Into<String>, operand: Node, fixity: Fixity, op_span: TextSpan) -> Self {
        let span = operand.span().union(&op_span);
        Self {
            operator: operator.into(),
            operand: Box::new(operand),
            fixity,
            span,
        }
    }
}

// ============================================================================
// Blocks
// ============================================================================

/// The tag of a block node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Main,
    Function,
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Case,
    Default,
    Return,
    Break,
    Continue,
    Throw,
    Try,
    Catch,
    Finally,
    /// Any other recognized keyword, handled generically.
    Keyword(String),
}

impl BlockKind {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "function" => BlockKind::Function,
            "if" => BlockKind::If,
            "else" => BlockKind::Else,
            "for" => BlockKind::For,
            "while" => BlockKind::While,
            "do" => BlockKind::Do,
            "switch" => BlockKind::Switch,
            "case" => BlockKind::Case,
            "default" => BlockKind::Default,
            "return" => BlockKind::Return,
            "break" => BlockKind::Break,
            "continue" => BlockKind::Continue,
            "throw" => BlockKind::Throw,
            "try" => BlockKind::Try,
            "catch" => BlockKind::Catch,
            "finally" => BlockKind::Finally,
            other => BlockKind::Keyword(other.to_string()),
        }
    }

    pub fn keyword(&self) -> &str {
        match self {
            BlockKind::Main => "main",
            BlockKind::Function => "function",
            BlockKind::If => "if",
            BlockKind::Else => "else",
            BlockKind::For => "for",
            BlockKind::While => "while",
            BlockKind::Do => "do",
            BlockKind::Switch => "switch",
            BlockKind::Case => "case",
            BlockKind::Default => "default",
            BlockKind::Return => "return",
            BlockKind::Break => "break",
            BlockKind::Continue => "continue",
            BlockKind::Throw => "throw",
            BlockKind::Try => "try",
            BlockKind::Catch => "catch",
            BlockKind::Finally => "finally",
            BlockKind::Keyword(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    /// Condition, parameter list, or the trailing value of `return`/`case`.
    pub header: Option<Box<Node>>,
    pub body: Vec<Node>,
    /// The scope this block owns.
    pub scope: ScopeId,
    /// Bound name of a named function literal.
    pub name: Option<String>,
    /// Whether the body was written between braces.
    pub delimited: bool,
    pub span: TextSpan,
}

impl Block {
    pub fn new(kind: BlockKind, scope: ScopeId, span: TextSpan) -> Self {
        Self {
            kind,
            header: None,
            body: Vec::new(),
            scope,
            name: None,
            delimited: false,
            span,
        }
    }

    pub fn set_header(&mut self, header: Node) {
        self.span = self.span.union(&header.span());
        self.header = Some(Box::new(header));
    }

    pub fn push(&mut self, node: Node) {
        self.span = self.span.union(&node.span());
        self.body.push(node);
    }

    /// Function parameters, when the header is a parameter list.
    pub fn parameters(&self) -> &[Node] {
        match self.header.as_deref() {
            Some(Node::Parenthesis(p)) if self.kind == BlockKind::Function => &p.items,
            _ => &[],
        }
    }
}
