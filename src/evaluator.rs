use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::diagnostic::{Diagnostic, Label, Span};
use crate::format::value_to_display;
use crate::lexer::{self, Token};
use crate::resolver;
use crate::value::Value;
use chumsky::span::Span as _;
use chumsky::Parser as _;
use std::fmt;
use std::rc::Rc;

/// Sentinel cell value for any expression that could not be evaluated.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum EvalError {
    TypeError(String),
    DivisionByZero,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::TypeError(msg) => write!(f, "Type error: {}", msg),
            EvalError::DivisionByZero => write!(f, "Division by zero"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Why a (document, expression) pair produced the N/A sentinel.
#[derive(Debug, Clone)]
pub enum EvalFailure {
    Parse { message: String, span: Span },
    Runtime(EvalError),
}

impl fmt::Display for EvalFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalFailure::Parse { message, .. } => write!(f, "{}", message),
            EvalFailure::Runtime(error) => write!(f, "{}", error),
        }
    }
}

impl EvalFailure {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            EvalFailure::Parse { message, span } => {
                Diagnostic::error("could not parse expression")
                    .with_label(Label::primary(*span, message.clone()))
            }
            EvalFailure::Runtime(error) => Diagnostic::error(error.to_string()),
        }
    }
}

/// Recursive-descent parser over the lexed token stream. Precedence, lowest
/// to highest: `||`, `&&`, comparisons, `+ -`, `* / %`, `^`, unary.
pub struct TokenParser {
    tokens: Vec<(Token, Span)>,
    current: usize,
    end: usize,
}

impl TokenParser {
    pub fn new(tokens: Vec<(Token, Span)>, source_len: usize) -> Self {
        Self {
            tokens,
            current: 0,
            end: source_len,
        }
    }

    fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|(tok, _)| tok)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.current)
            .map(|(_, span)| *span)
            .unwrap_or_else(|| Span::new(self.end, self.end))
    }

    fn advance(&mut self) -> Option<(Token, Span)> {
        if self.current < self.tokens.len() {
            let entry = self.tokens[self.current].clone();
            self.current += 1;
            Some(entry)
        } else {
            None
        }
    }

    fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        match self.tokens.get(self.current) {
            Some((token, span))
                if std::mem::discriminant(token) == std::mem::discriminant(&expected) =>
            {
                let span = *span;
                self.current += 1;
                Ok(span)
            }
            Some((token, span)) => Err(ParseError {
                message: format!("Expected {:?}, found {:?}", expected, token),
                span: *span,
            }),
            None => Err(ParseError {
                message: format!("Expected {:?}, found end of input", expected),
                span: self.current_span(),
            }),
        }
    }

    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if let Some(token) = self.current_token() {
            return Err(ParseError {
                message: format!("Unexpected token after expression: {:?}", token),
                span: self.current_span(),
            });
        }
        Ok(expr)
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_logical_or()
    }

    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_and()?;

        while matches!(self.current_token(), Some(Token::Or)) {
            self.advance();
            let right = self.parse_logical_and()?;
            let span = left.span.merge(right.span);
            left = Expr {
                kind: ExprKind::Binary {
                    left: Box::new(left),
                    op: BinaryOp::Or,
                    right: Box::new(right),
                },
                span,
            };
        }

        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;

        while matches!(self.current_token(), Some(Token::And)) {
            self.advance();
            let right = self.parse_comparison()?;
            let span = left.span.merge(right.span);
            left = Expr {
                kind: ExprKind::Binary {
                    left: Box::new(left),
                    op: BinaryOp::And,
                    right: Box::new(right),
                },
                span,
            };
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        while let Some(token) = self.current_token() {
            let binary_op = match token {
                Token::Eq => BinaryOp::Eq,
                Token::NotEq => BinaryOp::NotEq,
                Token::Greater => BinaryOp::Greater,
                Token::Less => BinaryOp::Less,
                Token::GreaterEq => BinaryOp::GreaterEq,
                Token::LessEq => BinaryOp::LessEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            let span = left.span.merge(right.span);
            left = Expr {
                kind: ExprKind::Binary {
                    left: Box::new(left),
                    op: binary_op,
                    right: Box::new(right),
                },
                span,
            };
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        while let Some(token) = self.current_token() {
            let binary_op = match token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            let span = left.span.merge(right.span);
            left = Expr {
                kind: ExprKind::Binary {
                    left: Box::new(left),
                    op: binary_op,
                    right: Box::new(right),
                },
                span,
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_power()?;

        while let Some(token) = self.current_token() {
            let binary_op = match token {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_power()?;
            let span = left.span.merge(right.span);
            left = Expr {
                kind: ExprKind::Binary {
                    left: Box::new(left),
                    op: binary_op,
                    right: Box::new(right),
                },
                span,
            };
        }

        Ok(left)
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while matches!(self.current_token(), Some(Token::Caret)) {
            self.advance();
            let right = self.parse_unary()?;
            let span = left.span.merge(right.span);
            left = Expr {
                kind: ExprKind::Binary {
                    left: Box::new(left),
                    op: BinaryOp::Pow,
                    right: Box::new(right),
                },
                span,
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.current_token() {
            Some(Token::Bang) => Some(UnaryOp::Not),
            Some(Token::Minus) => Some(UnaryOp::Neg),
            _ => None,
        };

        if let Some(op) = op {
            let op_span = self.current_span();
            self.advance();
            let expr = self.parse_unary()?;
            let span = op_span.merge(expr.span);
            return Ok(Expr {
                kind: ExprKind::Unary {
                    op,
                    expr: Box::new(expr),
                },
                span,
            });
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();

        match self.advance() {
            Some((Token::Number(n, is_float), _)) => Ok(Expr {
                kind: ExprKind::Literal(Value::Number(n, is_float)),
                span,
            }),
            Some((Token::String(s), _)) => Ok(Expr {
                kind: ExprKind::Literal(Value::String(Rc::from(s.as_str()))),
                span,
            }),
            Some((Token::True, _)) => Ok(Expr {
                kind: ExprKind::Literal(Value::Bool(true)),
                span,
            }),
            Some((Token::False, _)) => Ok(Expr {
                kind: ExprKind::Literal(Value::Bool(false)),
                span,
            }),
            Some((Token::Null, _)) => Ok(Expr {
                kind: ExprKind::Literal(Value::Null),
                span,
            }),
            Some((Token::Ident(name), _)) => self.parse_path(name, span),
            Some((Token::LParen, _)) => {
                let expr = self.parse_expression()?;
                let close = self.expect(Token::RParen)?;
                Ok(Expr {
                    kind: ExprKind::Grouped(Box::new(expr)),
                    span: span.merge(close),
                })
            }
            Some((token, span)) => Err(ParseError {
                message: format!("Unexpected token in expression: {:?}", token),
                span,
            }),
            None => Err(ParseError {
                message: "Expected expression, found end of input".to_string(),
                span,
            }),
        }
    }

    fn parse_path(&mut self, first: String, start: Span) -> Result<Expr, ParseError> {
        let mut segments = vec![first];
        let mut span = start;

        while matches!(self.current_token(), Some(Token::Dot)) {
            self.advance();
            match self.advance() {
                Some((Token::Ident(segment), segment_span)) => {
                    segments.push(segment);
                    span = span.merge(segment_span);
                }
                Some((token, token_span)) => {
                    return Err(ParseError {
                        message: format!("Expected field name after '.', found {:?}", token),
                        span: token_span,
                    });
                }
                None => {
                    return Err(ParseError {
                        message: "Expected field name after '.', found end of input".to_string(),
                        span: self.current_span(),
                    });
                }
            }
        }

        Ok(Expr {
            kind: ExprKind::Path(segments),
            span,
        })
    }
}

/// Parses a path expression into its AST without evaluating it.
pub fn parse_expression(expression: &str) -> Result<Expr, EvalFailure> {
    let (output, errors) = lexer::lexer().parse(expression).into_output_errors();
    if !errors.is_empty() || output.is_none() {
        return Err(EvalFailure::Parse {
            message: "Unrecognized token in expression".to_string(),
            span: Span::new(0, expression.len()),
        });
    }

    let tokens: Vec<(Token, Span)> = output
        .unwrap_or_default()
        .into_iter()
        .map(|(token, span)| (token, Span::new(span.start(), span.end())))
        .collect();

    let mut parser = TokenParser::new(tokens, expression.len());
    parser.parse().map_err(|e| EvalFailure::Parse {
        message: e.message,
        span: e.span,
    })
}

/// Evaluates a parsed expression against one document. Operands are
/// `Option<Value>` with `None` standing in for an unresolved path, so a
/// missing field flows through the operators instead of aborting.
pub struct Evaluator<'a> {
    root: &'a Value,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    pub fn eval_expr(&self, expr: &Expr) -> Result<Option<Value>, EvalError> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(Some(value.clone())),

            ExprKind::Path(segments) => Ok(resolver::resolve(self.root, &segments.join("."))),

            ExprKind::Grouped(inner) => self.eval_expr(inner),

            ExprKind::Unary { op, expr } => {
                let operand = self.eval_expr(expr)?;
                self.eval_unary_op(op, &operand)
            }

            ExprKind::Binary { left, op, right } => match op {
                BinaryOp::And => {
                    let left_val = self.eval_expr(left)?;
                    if !truthy(&left_val) {
                        Ok(left_val)
                    } else {
                        self.eval_expr(right)
                    }
                }
                BinaryOp::Or => {
                    let left_val = self.eval_expr(left)?;
                    if truthy(&left_val) {
                        Ok(left_val)
                    } else {
                        self.eval_expr(right)
                    }
                }
                _ => {
                    let left_val = self.eval_expr(left)?;
                    let right_val = self.eval_expr(right)?;
                    self.eval_binary_op(&left_val, op, &right_val)
                }
            },
        }
    }

    fn eval_binary_op(
        &self,
        left: &Option<Value>,
        op: &BinaryOp,
        right: &Option<Value>,
    ) -> Result<Option<Value>, EvalError> {
        match op {
            BinaryOp::Add => {
                if is_string(left) || is_string(right) {
                    let mut combined = display_operand(left);
                    combined.push_str(&display_operand(right));
                    Ok(Some(Value::String(Rc::from(combined.as_str()))))
                } else {
                    let result = numeric_operand(left)? + numeric_operand(right)?;
                    Ok(Some(number_value(result)))
                }
            }
            BinaryOp::Sub => {
                let result = numeric_operand(left)? - numeric_operand(right)?;
                Ok(Some(number_value(result)))
            }
            BinaryOp::Mul => {
                let result = numeric_operand(left)? * numeric_operand(right)?;
                Ok(Some(number_value(result)))
            }
            BinaryOp::Div => {
                let dividend = numeric_operand(left)?;
                let divisor = numeric_operand(right)?;
                if divisor == 0.0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(Some(number_value(dividend / divisor)))
                }
            }
            BinaryOp::Mod => {
                let result = numeric_operand(left)? % numeric_operand(right)?;
                Ok(Some(number_value(result)))
            }
            BinaryOp::Pow => {
                let result = numeric_operand(left)?.powf(numeric_operand(right)?);
                Ok(Some(number_value(result)))
            }
            BinaryOp::Eq => Ok(Some(Value::Bool(loose_equals(left, right)))),
            BinaryOp::NotEq => Ok(Some(Value::Bool(!loose_equals(left, right)))),
            BinaryOp::Greater => self.compare(left, right, |ord| ord == std::cmp::Ordering::Greater),
            BinaryOp::Less => self.compare(left, right, |ord| ord == std::cmp::Ordering::Less),
            BinaryOp::GreaterEq => {
                self.compare(left, right, |ord| ord != std::cmp::Ordering::Less)
            }
            BinaryOp::LessEq => {
                self.compare(left, right, |ord| ord != std::cmp::Ordering::Greater)
            }
            // Reached only when called directly; eval_expr short-circuits.
            BinaryOp::And => Ok(if !truthy(left) {
                left.clone()
            } else {
                right.clone()
            }),
            BinaryOp::Or => Ok(if truthy(left) {
                left.clone()
            } else {
                right.clone()
            }),
        }
    }

    fn compare(
        &self,
        left: &Option<Value>,
        right: &Option<Value>,
        check: impl Fn(std::cmp::Ordering) -> bool,
    ) -> Result<Option<Value>, EvalError> {
        if let (Some(Value::String(a)), Some(Value::String(b))) = (left, right) {
            return Ok(Some(Value::Bool(check(a.as_ref().cmp(b.as_ref())))));
        }
        let a = numeric_operand(left)?;
        let b = numeric_operand(right)?;
        let holds = match a.partial_cmp(&b) {
            Some(ord) => check(ord),
            // NaN compares false against everything.
            None => false,
        };
        Ok(Some(Value::Bool(holds)))
    }

    fn eval_unary_op(
        &self,
        op: &UnaryOp,
        operand: &Option<Value>,
    ) -> Result<Option<Value>, EvalError> {
        match op {
            UnaryOp::Not => Ok(Some(Value::Bool(!truthy(operand)))),
            UnaryOp::Neg => Ok(Some(number_value(-numeric_operand(operand)?))),
        }
    }
}

fn truthy(operand: &Option<Value>) -> bool {
    match operand {
        Some(value) => value.is_truthy(),
        None => false,
    }
}

fn is_string(operand: &Option<Value>) -> bool {
    matches!(operand, Some(Value::String(_)))
}

fn display_operand(operand: &Option<Value>) -> String {
    match operand {
        Some(value) => value_to_display(value),
        None => "undefined".to_string(),
    }
}

/// Numeric coercion: null is 0, booleans are 0/1, an unresolved path is NaN,
/// strings parse after trimming (empty string is 0). Containers have no
/// numeric meaning and fail the evaluation.
fn numeric_operand(operand: &Option<Value>) -> Result<f64, EvalError> {
    match operand {
        None => Ok(f64::NAN),
        Some(Value::Null) => Ok(0.0),
        Some(Value::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
        Some(Value::Number(n, _)) => Ok(*n),
        Some(Value::String(s)) => Ok(parse_numeric_string(s)),
        Some(Value::Array(_)) => Err(EvalError::TypeError(
            "array has no numeric value".to_string(),
        )),
        Some(Value::Object(_)) => Err(EvalError::TypeError(
            "object has no numeric value".to_string(),
        )),
    }
}

fn parse_numeric_string(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn number_value(n: f64) -> Value {
    Value::Number(n, n.fract() != 0.0 || !n.is_finite())
}

fn loose_equals(left: &Option<Value>, right: &Option<Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (None, Some(Value::Null)) | (Some(Value::Null), None) => true,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Number(n, _), Value::String(s)) | (Value::String(s), Value::Number(n, _)) => {
                parse_numeric_string(s) == *n
            }
            _ => a == b,
        },
        _ => false,
    }
}

fn render_result(result: &Option<Value>) -> String {
    match result {
        Some(value) => value_to_display(value),
        None => "undefined".to_string(),
    }
}

/// Evaluates an expression against a document, surfacing the failure cause.
pub fn try_evaluate(root: &Value, expression: &str) -> Result<String, EvalFailure> {
    let expr = parse_expression(expression)?;
    let evaluator = Evaluator::new(root);
    let result = evaluator.eval_expr(&expr).map_err(EvalFailure::Runtime)?;
    Ok(render_result(&result))
}

/// Evaluates an expression against a document. Any lex, parse, or runtime
/// failure collapses to the `"N/A"` sentinel; nothing escapes.
pub fn evaluate(root: &Value, expression: &str) -> String {
    try_evaluate(root, expression).unwrap_or_else(|_| NOT_AVAILABLE.to_string())
}
