//! The parser implementation.
//!
//! Expressions are parsed in two phases: an initial value chosen by the
//! lead token, then continuations (ternary, call, assignment, binary
//! operator) applied in encounter order. Binary operators are folded
//! without precedence: the right operand of an operator is a complete
//! value, so `a * b + c` nests as `a * (b + c)` in the tree while keeping
//! the text order that the host language re-parses with its own rules.

use crate::keywords::{self, HeaderPolicy};
use jsphp_ast::node::*;
use jsphp_ast::scope::{ScopeId, ScopeTable};
use jsphp_ast::syntax_kind::{is_prefix_operator, TokenKind};
use jsphp_core::text::TextSpan;
use jsphp_diagnostics::{messages, CompileError, DiagnosticMessage, Result};
use jsphp_options::CompilerOptions;
use jsphp_scanner::{Scanner, Token, TokenStream};

/// One parsed compilation unit.
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    pub file_name: String,
    /// The implicit `main` block.
    pub root: Block,
    /// Every scope created while parsing, indexed by [`ScopeId`].
    pub scopes: ScopeTable,
}

/// Parse `source` into its main block.
pub fn parse(file_name: &str, source: &str, options: &CompilerOptions) -> Result<ParsedUnit> {
    Parser::new(file_name, source, options).parse()
}

/// The parser produces the main [`Block`] of one compilation unit.
pub struct Parser {
    tokens: TokenStream,
    scopes: ScopeTable,
    /// Scopes of the blocks being parsed, innermost last.
    stack: Vec<ScopeId>,
}

impl Parser {
    pub fn new(file_name: &str, source: &str, options: &CompilerOptions) -> Self {
        let scanner = Scanner::new(file_name, source, options.reserved_prefixes());
        Self {
            tokens: TokenStream::new(scanner),
            scopes: ScopeTable::new(),
            stack: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Result<ParsedUnit> {
        let scope = self.scopes.alloc(None);
        let end = self.tokens.end_span().start;
        let mut root = Block::new(BlockKind::Main, scope, TextSpan::new(0, end));
        self.in_scope(scope, |p| p.parse_main_body(&mut root))?;
        log::debug!(
            "parsed {}: {} statements, {} scopes",
            self.tokens.file_name(),
            root.body.len(),
            self.scopes.len()
        );
        Ok(ParsedUnit {
            file_name: self.tokens.file_name().to_string(),
            root,
            scopes: self.scopes,
        })
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn next(&mut self) -> Result<Option<Token>> {
        self.tokens.consume()
    }

    #[inline]
    fn skip(&mut self) -> Result<()> {
        self.tokens.skip()
    }

    /// Test the next token without consuming it. False at end of input.
    fn at(&mut self, predicate: impl FnOnce(&Token) -> bool) -> Result<bool> {
        Ok(self.tokens.peek(0)?.map_or(false, predicate))
    }

    #[inline]
    fn at_punct(&mut self, c: char) -> Result<bool> {
        self.at(|t| t.is_punct(c))
    }

    fn expect_punct(&mut self, c: char) -> Result<Token> {
        match self.next()? {
            Some(token) if token.is_punct(c) => Ok(token),
            Some(token) => {
                let expected = format!("'{}'", c);
                Err(self.error(&messages::UNEXPECTED_0_EXPECTED_1, &[&token.describe(), &expected], token.span))
            }
            None => Err(self.unexpected_end(&format!("'{}'", c))),
        }
    }

    /// The closing `c` of a group opened at `open`.
    fn expect_close(&mut self, c: char, missing: &DiagnosticMessage, open: TextSpan) -> Result<Token> {
        match self.next()? {
            Some(token) if token.is_punct(c) => Ok(token),
            Some(token) => Err(self.unexpected(&token)),
            None => Err(self.error(missing, &[], open)),
        }
    }

    fn skip_terminator(&mut self) -> Result<()> {
        if self.at_punct(';')? {
            self.skip()?;
        }
        Ok(())
    }

    // ========================================================================
    // Errors
    // ========================================================================

    fn error(&self, message: &DiagnosticMessage, args: &[&str], span: TextSpan) -> CompileError {
        CompileError::new(message, args, self.tokens.locate(span))
    }

    pub(crate) fn unexpected(&self, token: &Token) -> CompileError {
        self.error(&messages::UNEXPECTED_0, &[&token.describe()], token.span)
    }

    fn unexpected_end(&self, expected: &str) -> CompileError {
        self.error(&messages::UNEXPECTED_END_OF_INPUT_EXPECTED_0, &[expected], self.tokens.end_span())
    }

    /// Consume the next token and report it as unexpected.
    fn reject_next(&mut self, expected: &str) -> CompileError {
        match self.next() {
            Ok(Some(token)) => self.unexpected(&token),
            Ok(None) => self.unexpected_end(expected),
            Err(err) => err,
        }
    }

    /// Input ended where a value was required.
    fn value_expected(&self) -> CompileError {
        let last = self.tokens.last_span();
        let text = self.tokens.source_text().get(last.to_range()).unwrap_or_default();
        self.error(&messages::VALUE_EXPECTED_AFTER_0, &[&format!("'{}'", text)], self.tokens.end_span())
    }

    // ========================================================================
    // Scope stack
    // ========================================================================

    /// Run `f` with `scope` pushed on the scope stack. The scope is popped
    /// on every exit path, errors included.
    fn in_scope<T>(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.stack.push(scope);
        let depth = self.stack.len();
        let result = f(self);
        debug_assert_eq!(self.stack.len(), depth);
        self.stack.pop();
        result
    }

    fn new_scope(&mut self) -> ScopeId {
        let parent = self.stack.last().copied();
        self.scopes.alloc(parent)
    }

    /// The innermost scope on the stack that declared `name`.
    fn resolve(&self, name: &str) -> Option<ScopeId> {
        self.stack
            .iter()
            .rev()
            .copied()
            .find(|&scope| self.scopes.declares(scope, name))
    }

    /// Register the upcoming variable token in the current scope, leaving
    /// the token in place.
    fn declare_next(&mut self) -> Result<()> {
        let name = match self.tokens.peek(0)? {
            Some(token) if token.kind == TokenKind::Variable => token.text.clone(),
            _ => return Err(self.reject_next("variable")),
        };
        if let Some(&scope) = self.stack.last() {
            self.scopes.declare(scope, &name);
        }
        Ok(())
    }

    // ========================================================================
    // Blocks and statements
    // ========================================================================

    fn parse_main_body(&mut self, root: &mut Block) -> Result<()> {
        while !self.tokens.at_end()? {
            if self.at_punct('}')? {
                return Err(self.reject_next("statement"));
            }
            self.parse_statement(root)?;
        }
        Ok(())
    }

    /// Parse one statement into `block`. A declaration list may push
    /// several statements and a bare `;` pushes none.
    fn parse_statement(&mut self, block: &mut Block) -> Result<()> {
        let Some(token) = self.next()? else {
            return Err(self.unexpected_end("statement"));
        };
        if token.is_punct(';') {
            return Ok(());
        }
        if token.kind == TokenKind::Keyword {
            return match token.value() {
                "let" | "const" => self.parse_declarations(block, true),
                "var" => self.parse_declarations(block, false),
                _ => {
                    let node = self.parse_keyword_block(&token)?;
                    block.push(node);
                    Ok(())
                }
            };
        }
        if token.kind == TokenKind::Function && self.at(|t| t.kind == TokenKind::Variable)? {
            // A named function statement takes no continuation.
            let function = self.parse_function(&token)?;
            block.push(function);
            return Ok(());
        }
        match self.get_value(&token)? {
            Some(value) => {
                block.push(value);
                Ok(())
            }
            None => Err(self.unexpected(&token)),
        }
    }

    /// `let a = 1, b`: each name is registered in the current scope (for
    /// `let`/`const`) and its declarator is parsed as an ordinary
    /// expression statement. A `let` without initializer assigns null.
    fn parse_declarations(&mut self, block: &mut Block, block_local: bool) -> Result<()> {
        loop {
            if block_local {
                self.declare_next()?;
            } else if !self.at(|t| t.kind == TokenKind::Variable)? {
                return Err(self.reject_next("variable"));
            }
            match self.expect_value_next()? {
                Node::Variable(variable) if variable.is_bare() => {
                    if block_local {
                        let null = Constant::new(ConstantKind::Constant, "null", TextSpan::empty(variable.span.end()));
                        let init = self.assign("=", Node::Variable(variable), Node::Constant(null))?;
                        block.push(init);
                    }
                }
                statement => block.push(statement),
            }
            if !self.at_punct(',')? {
                return Ok(());
            }
            self.skip()?;
        }
    }

    fn parse_keyword_block(&mut self, token: &Token) -> Result<Node> {
        let keyword = token.value().to_string();
        let scope = self.new_scope();
        let mut block = Block::new(BlockKind::from_keyword(&keyword), scope, token.span);
        let handler = keywords::handler_for(&keyword);
        self.in_scope(scope, |p| handler(p, &mut block))?;
        log::debug!("parsed '{}' block at {:?}", keyword, block.span);
        Ok(Node::Block(block))
    }

    /// The optional value of `return`, `break`, `continue` and `throw`.
    pub(crate) fn parse_trailing_value(&mut self, block: &mut Block) -> Result<()> {
        let has_value = self.at(|t| {
            !(t.is_punct(';') || t.is_punct('}') || t.kind == TokenKind::Keyword || t.newline_before)
        })?;
        if has_value {
            let value = self.expect_value_next()?;
            block.set_header(value);
        }
        Ok(())
    }

    pub(crate) fn parse_case_label(&mut self, block: &mut Block) -> Result<()> {
        let malformed = |p: &Self, span: TextSpan| p.error(&messages::CASE_MUST_BE_FOLLOWED_BY_VALUE_AND_COLON, &[], span);
        if !self.at(|t| !t.is_punct(':'))? {
            return Err(malformed(self, block.span));
        }
        let value = self.expect_value_next()?;
        block.set_header(value);
        match self.next()? {
            Some(colon) if colon.is_punct(':') => Ok(()),
            Some(other) => Err(malformed(self, other.span)),
            None => Err(malformed(self, self.tokens.end_span())),
        }
    }

    pub(crate) fn parse_default_label(&mut self, block: &mut Block) -> Result<()> {
        match self.next()? {
            Some(colon) if colon.is_punct(':') => Ok(()),
            Some(other) => Err(self.error(&messages::DEFAULT_MUST_BE_FOLLOWED_BY_COLON, &[], other.span)),
            None => Err(self.error(&messages::DEFAULT_MUST_BE_FOLLOWED_BY_COLON, &[], block.span)),
        }
    }

    /// The parenthesized header of a keyword block, under `policy`.
    pub(crate) fn parse_header(&mut self, block: &mut Block, policy: HeaderPolicy) -> Result<()> {
        if self.at_punct('(')? {
            let open = self.expect_punct('(')?;
            if policy == HeaderPolicy::Forbidden {
                let keyword = block.kind.keyword().to_string();
                return Err(self.error(&messages::BLOCK_0_CANNOT_HAVE_PARENTHESES, &[&keyword], open.span));
            }
            let group = self.parse_group(open.span)?;
            block.set_header(Node::Parenthesis(group));
        } else if policy == HeaderPolicy::Required {
            let keyword = block.kind.keyword().to_string();
            let span = match self.tokens.peek(0)? {
                Some(token) => token.span,
                None => self.tokens.end_span(),
            };
            return Err(self.error(&messages::BLOCK_0_NEEDS_PARENTHESES, &[&keyword], span));
        }
        Ok(())
    }

    /// A braced body, or a single statement.
    pub(crate) fn parse_body(&mut self, block: &mut Block) -> Result<()> {
        if self.at_punct('{')? {
            let open = self.expect_punct('{')?;
            block.delimited = true;
            self.parse_delimited(block, open.span)
        } else {
            self.parse_single_statement(block)
        }
    }

    /// `while (cond)` after a `do` body becomes the loop condition.
    pub(crate) fn parse_do_condition(&mut self, block: &mut Block) -> Result<()> {
        if self.at(|t| t.is_keyword("while"))? {
            self.skip()?;
            let open = self.expect_punct('(')?;
            let condition = self.parse_group(open.span)?;
            block.set_header(Node::Parenthesis(condition));
        }
        Ok(())
    }

    /// Statements up to the `}` matching the brace at `open`.
    fn parse_delimited(&mut self, block: &mut Block, open: TextSpan) -> Result<()> {
        loop {
            if self.tokens.at_end()? {
                return Err(self.error(&messages::MISSING_CLOSE_BRACE, &[], open));
            }
            if self.at_punct('}')? {
                let close = self.expect_punct('}')?;
                block.span = block.span.union(&close.span);
                return Ok(());
            }
            self.parse_statement(block)?;
        }
    }

    /// One statement and its `;`, plus the `else` branches that belong to
    /// a nested `if`.
    fn parse_single_statement(&mut self, block: &mut Block) -> Result<()> {
        self.parse_statement(block)?;
        self.skip_terminator()?;
        while ends_with_if(block) && self.at(|t| t.is_keyword("else"))? {
            self.parse_statement(block)?;
            self.skip_terminator()?;
        }
        Ok(())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Consume the next token and parse a complete value from it.
    pub(crate) fn expect_value_next(&mut self) -> Result<Node> {
        let token = self.next()?;
        self.expect_value(token)
    }

    fn expect_value(&mut self, token: Option<Token>) -> Result<Node> {
        let Some(token) = token else {
            return Err(self.value_expected());
        };
        match self.get_value(&token)? {
            Some(value) => Ok(value),
            None => Err(self.unexpected(&token)),
        }
    }

    /// An initial value and its continuations, or None if `token` cannot
    /// start a value.
    fn get_value(&mut self, token: &Token) -> Result<Option<Node>> {
        match self.get_initial_value(token)? {
            Some(value) => self.append_continuations(value).map(Some),
            None => Ok(None),
        }
    }

    fn get_initial_value(&mut self, token: &Token) -> Result<Option<Node>> {
        let node = match token.kind {
            TokenKind::Function => self.parse_function(token)?,
            TokenKind::Punctuation if token.is_punct('(') => self.parse_parentheses(token.span)?,
            TokenKind::Punctuation if token.is_punct('[') => self.parse_ordered_array(token.span)?,
            TokenKind::Punctuation if token.is_punct('{') => self.parse_keyed_array(token.span)?,
            TokenKind::Operator if is_prefix_operator(token.value()) => self.parse_prefix(token)?,
            TokenKind::Variable => self.parse_variable(token)?,
            TokenKind::Constant => Node::Constant(Constant::new(ConstantKind::Constant, token.value(), token.span)),
            TokenKind::Number => Node::Constant(Constant::new(ConstantKind::Number, token.value(), token.span)),
            TokenKind::String => Node::Constant(Constant::new(ConstantKind::String, token.value(), token.span)),
            _ => return Ok(None),
        };
        Ok(Some(node))
    }

    /// Extend `value` with ternaries, calls, assignments and binary
    /// operators, in encounter order.
    fn append_continuations(&mut self, mut value: Node) -> Result<Node> {
        loop {
            let Some(token) = self.tokens.peek(0)?.cloned() else {
                break;
            };
            let starts_value = token.is_value() || token.is_punct('{') || token.expects_no_left_member();
            if starts_value && token.newline_before {
                // A value on a new line starts the next statement.
                break;
            }
            if starts_value {
                self.skip()?;
                return Err(self.unexpected(&token));
            }
            if token.is_operator("?") {
                self.skip()?;
                value = self.parse_ternary(value)?;
                continue;
            }
            if token.is_punct('(') {
                value = self.parse_call(value)?;
                continue;
            }
            if token.kind != TokenKind::Operator {
                break;
            }
            let operator = token.value();
            if (operator == "++" || operator == "--") && token.newline_before {
                // No postfix across a line break: it prefixes the next statement.
                break;
            }
            self.skip()?;
            if operator == "++" || operator == "--" {
                self.require_assignable(&value)?;
                value = Node::Unary(Unary::new(operator, value, Fixity::Postfix, token.span));
                break;
            }
            let right = self.expect_value_next()?;
            value = if token.is_assignation() {
                self.assign(operator, value, right)?
            } else {
                Node::Dyiade(Dyiade::new(operator, value, right))
            };
        }
        Ok(value)
    }

    /// `callee(args)`, the `(` not yet consumed.
    fn parse_call(&mut self, callee: Node) -> Result<Node> {
        let open = self.expect_punct('(')?;
        let arguments = self.parse_group(open.span)?;
        Ok(Node::FunctionCall(FunctionCall::new(callee, arguments.items, arguments.span)))
    }

    fn assign(&self, operator: &str, target: Node, value: Node) -> Result<Node> {
        Assignation::new(operator, target, value)
            .map(Node::Assignation)
            .map_err(|(target, reason)| self.error(&messages::NOT_ASSIGNABLE_0, &[&reason], target.span()))
    }

    fn require_assignable(&self, node: &Node) -> Result<()> {
        if node.is_assignable() {
            return Ok(());
        }
        let reason = node.non_assignable_reason();
        Err(self.error(&messages::NOT_ASSIGNABLE_0, &[&reason], node.span()))
    }

    /// A prefix operator applies to the next initial value and its calls.
    /// Other continuations apply to the unary node itself.
    fn parse_prefix(&mut self, operator: &Token) -> Result<Node> {
        let Some(token) = self.next()? else {
            return Err(self.value_expected());
        };
        let Some(operand) = self.get_initial_value(&token)? else {
            return Err(self.unexpected(&token));
        };
        let mut operand = operand;
        while self.at_punct('(')? {
            operand = self.parse_call(operand)?;
        }
        let op = operator.value();
        if matches!(op, "++" | "--" | "delete") {
            self.require_assignable(&operand)?;
        }
        Ok(Node::Unary(Unary::new(op, operand, Fixity::Prefix, operator.span)))
    }

    /// `cond ? then : else`, the `?` consumed. The else branch is a
    /// complete value, so chained ternaries nest to the right.
    fn parse_ternary(&mut self, condition: Node) -> Result<Node> {
        let question = self.tokens.last_span();
        let Some(token) = self.next()? else {
            return Err(self.error(&messages::TERNARY_NOT_CLOSED_AFTER_QUESTION, &[], question));
        };
        let then_value = self.expect_value(Some(token))?;
        match self.next()? {
            Some(colon) if colon.is_punct(':') => {}
            Some(other) => {
                return Err(self.error(&messages::TERNARY_COLON_EXPECTED_BUT_0_GIVEN, &[&other.describe()], other.span));
            }
            None => return Err(self.error(&messages::TERNARY_NOT_CLOSED_AFTER_QUESTION, &[], question)),
        }
        let colon = self.tokens.last_span();
        let Some(token) = self.next()? else {
            return Err(self.error(&messages::TERNARY_NOT_CLOSED_AFTER_COLON, &[], colon));
        };
        let else_value = self.expect_value(Some(token))?;
        Ok(Node::Ternary(Ternary::new(condition, then_value, else_value)))
    }

    /// A variable and its `.name` / `[expr]` access chain. A trailing `=>`
    /// turns the whole chain into the single parameter of a lambda.
    fn parse_variable(&mut self, token: &Token) -> Result<Node> {
        let name = token.text.clone();
        let mut chain = Vec::new();
        let mut span = token.span;
        loop {
            if self.at_punct('.')? {
                self.skip()?;
                let property = match self.next()? {
                    Some(t) if is_property_name(&t) => t,
                    Some(t) => return Err(self.unexpected(&t)),
                    None => return Err(self.unexpected_end("property name")),
                };
                span = span.union(&property.span);
                chain.push(Access::Property(Constant::quoted(&property.text, property.span)));
            } else if self.at_punct('[')? {
                let open = self.expect_punct('[')?;
                let index = self.expect_value_next()?;
                let close = self.expect_close(']', &messages::MISSING_CLOSE_BRACKET, open.span)?;
                span = span.union(&close.span);
                chain.push(Access::Index(index));
            } else if self.at(|t| t.kind == TokenKind::Lambda)? {
                self.skip()?;
                let scope = self.resolve(&name);
                let parameter = Node::Variable(Variable::new(name, chain, span).with_scope(scope));
                let parameters = Parenthesis {
                    items: vec![parameter],
                    separator: Separator::Comma,
                    span,
                };
                return self.parse_lambda(parameters);
            } else {
                break;
            }
        }
        let scope = self.resolve(&name);
        Ok(Node::Variable(Variable::new(name, chain, span).with_scope(scope)))
    }

    /// Items of a parenthesized group up to the `)` matching `open`.
    /// Items are separated by `,` or, in loop headers, by `;`.
    fn parse_group(&mut self, open: TextSpan) -> Result<Parenthesis> {
        let mut group = Parenthesis {
            items: Vec::new(),
            separator: Separator::Comma,
            span: open,
        };
        let mut expect_separator = false;
        loop {
            let Some(token) = self.next()? else {
                return Err(self.error(&messages::MISSING_CLOSE_PAREN, &[], open));
            };
            if token.is_punct(')') {
                group.span = group.span.union(&token.span);
                return Ok(group);
            }
            if expect_separator {
                if token.is_punct(';') {
                    group.separator = Separator::Semicolon;
                } else if !token.is_punct(',') {
                    return Err(self.unexpected(&token));
                }
                expect_separator = false;
                continue;
            }
            if token.is_keyword("let") || token.is_keyword("const") {
                self.declare_next()?;
                continue;
            }
            if token.is_keyword("var") {
                continue;
            }
            match self.get_value(&token)? {
                Some(value) => {
                    group.items.push(value);
                    expect_separator = true;
                }
                None => return Err(self.unexpected(&token)),
            }
        }
    }

    /// A parenthesized group, or a lambda when `=>` follows it.
    fn parse_parentheses(&mut self, open: TextSpan) -> Result<Node> {
        let group = self.parse_group(open)?;
        if self.at(|t| t.kind == TokenKind::Lambda)? {
            self.skip()?;
            return self.parse_lambda(group);
        }
        Ok(Node::Parenthesis(group))
    }

    /// The body of a lambda, the `=>` consumed. An expression body becomes
    /// a single `return`.
    fn parse_lambda(&mut self, parameters: Parenthesis) -> Result<Node> {
        let scope = self.new_scope();
        let mut lambda = Block::new(BlockKind::Function, scope, parameters.span);
        lambda.set_header(Node::Parenthesis(parameters));
        self.in_scope(scope, |p| {
            if p.at_punct('{')? {
                return p.parse_body(&mut lambda);
            }
            let arrow = p.tokens.last_span();
            let value = p.expect_value_next()?;
            let return_scope = p.new_scope();
            let mut ret = Block::new(BlockKind::Return, return_scope, arrow);
            ret.set_header(value);
            lambda.push(Node::Block(ret));
            Ok(())
        })?;
        Ok(Node::Block(lambda))
    }

    /// `function name?(params) { body }`, the keyword consumed.
    fn parse_function(&mut self, keyword: &Token) -> Result<Node> {
        let name = if self.at(|t| t.kind == TokenKind::Variable)? {
            self.next()?.map(|t| t.text)
        } else {
            None
        };
        let open = self.expect_punct('(')?;
        let parameters = self.parse_group(open.span)?;
        let scope = self.new_scope();
        let mut function = Block::new(BlockKind::Function, scope, keyword.span);
        function.name = name;
        function.set_header(Node::Parenthesis(parameters));
        let open = self.expect_punct('{')?;
        function.delimited = true;
        self.in_scope(scope, |p| p.parse_delimited(&mut function, open.span))?;
        log::debug!("parsed function {:?} at {:?}", function.name, function.span);
        Ok(Node::Block(function))
    }

    /// `[a, b]`, the `[` consumed.
    fn parse_ordered_array(&mut self, open: TextSpan) -> Result<Node> {
        let mut items = Vec::new();
        let mut expect_comma = false;
        loop {
            let Some(token) = self.next()? else {
                return Err(self.error(&messages::MISSING_CLOSE_BRACKET, &[], open));
            };
            if token.is_punct(']') {
                let span = open.union(&token.span);
                return Ok(Node::OrderedArray(OrderedArray { items, span }));
            }
            if expect_comma {
                if token.is_punct(',') {
                    expect_comma = false;
                    continue;
                }
                return Err(self.unexpected(&token));
            }
            match self.get_value(&token)? {
                Some(value) => {
                    items.push(value);
                    expect_comma = true;
                }
                None => return Err(self.unexpected(&token)),
            }
        }
    }

    /// `{key: value, ...}`, the `{` consumed. Identifier-like keys become
    /// string literals; number and string keys are kept verbatim.
    fn parse_keyed_array(&mut self, open: TextSpan) -> Result<Node> {
        let mut entries = Vec::new();
        let mut expect_comma = false;
        loop {
            let Some(token) = self.next()? else {
                return Err(self.error(&messages::MISSING_CLOSE_BRACE, &[], open));
            };
            if token.is_punct('}') {
                let span = open.union(&token.span);
                return Ok(Node::KeyedArray(KeyedArray { entries, span }));
            }
            if expect_comma {
                if token.is_punct(',') {
                    expect_comma = false;
                    continue;
                }
                return Err(self.unexpected(&token));
            }
            let key = match token.kind {
                TokenKind::Keyword | TokenKind::Variable | TokenKind::Function | TokenKind::Constant => {
                    Constant::quoted(&token.text, token.span)
                }
                TokenKind::Number => Constant::new(ConstantKind::Number, token.value(), token.span),
                TokenKind::String => Constant::new(ConstantKind::String, token.value(), token.span),
                _ => return Err(self.unexpected(&token)),
            };
            match self.next()? {
                Some(colon) if colon.is_punct(':') => {}
                Some(other) => return Err(self.unexpected(&other)),
                None => {
                    return Err(self.error(&messages::MISSING_VALUE_AFTER_KEY_0, &[&token.text], token.span));
                }
            }
            let value = self.expect_value_next()?;
            entries.push((key, value));
            expect_comma = true;
        }
    }
}

/// Tokens usable as a `.name` property.
fn is_property_name(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Variable | TokenKind::Keyword | TokenKind::Function | TokenKind::Constant
    )
}

fn ends_with_if(block: &Block) -> bool {
    matches!(block.body.last(), Some(Node::Block(b)) if b.kind == BlockKind::If)
}
