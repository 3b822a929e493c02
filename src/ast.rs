use std::{fmt, rc::Rc};

/// Represents a literal value in the language.
///
/// `LiteralValue` covers the raw, constant values that can appear directly in
/// source code: `null`, booleans, integer and float numbers, and strings.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// The `null` keyword.
    Null,
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal.
    Real(f64),
    /// A string literal with its raw, unescaped contents.
    Str(String),
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// How a property is addressed in a get or set expression.
///
/// Both forms behave identically at runtime; they are kept apart so that the
/// canonical rendering reproduces the source form.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// `object.name`
    Named(String),
    /// `object[expr]`
    Computed(Box<Expr>),
}

/// A function literal or declaration.
///
/// The declaration is shared between the tree and every function value created
/// from it, so the body is never copied at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// Name of the function, absent for anonymous function expressions.
    pub name:   Option<String>,
    /// Parameter names in declaration order.
    pub params: Vec<String>,
    /// Statements making up the body.
    pub body:   Vec<Stmt>,
    /// Line number in the source code.
    pub line:   usize,
}

/// A class literal or declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Name of the class, absent for anonymous class expressions.
    pub name:    Option<String>,
    /// Members in declaration order.
    pub members: Vec<ClassMember>,
    /// Line number in the source code.
    pub line:    usize,
}

/// A single member of a class body.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// `[static] name [= initializer];`
    Field {
        /// Field name.
        name:        String,
        /// Default value expression.
        initializer: Option<Expr>,
        /// Whether the field lives on the class itself.
        is_static:   bool,
        /// Line number in the source code.
        line:        usize,
    },
    /// `[static] name(params) { body }`
    Method {
        /// The method's function declaration, always named.
        function:  Rc<FunctionDecl>,
        /// Whether the method lives on the class itself.
        is_static: bool,
    },
}

impl ClassMember {
    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Field { name, .. } => name,
            Self::Method { function, .. } => function.name.as_deref().unwrap_or_default(),
        }
    }

    /// Returns `true` for members marked `static`.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        match self {
            Self::Field { is_static, .. } | Self::Method { is_static, .. } => *is_static,
        }
    }
}

/// An abstract syntax tree (AST) node representing an expression.
///
/// `Expr` covers every expression form of the language, from literals and
/// variable references to calls, property access, and function and class
/// literals. Every variant records the source line it started on.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, boolean or `null`).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// Assignment to an existing variable: `name = value`.
    Assign {
        /// Name of the variable.
        name:  String,
        /// The value being assigned.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A binary operation (arithmetic, bitwise, comparison).
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A short-circuiting `&&` or `||`.
    Logical {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    LogicalOperator,
        /// Right operand, evaluated only when needed.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A prefix unary operation (`-x`, `!x`, `++x`, ...).
    Unary {
        /// The unary operator to apply.
        op:      UnaryOperator,
        /// The operand expression.
        operand: Box<Self>,
        /// Line number in the source code.
        line:    usize,
    },
    /// A postfix `x++` or `x--`.
    Postfix {
        /// Either `Increment` or `Decrement`.
        op:      UnaryOperator,
        /// The operand expression.
        operand: Box<Self>,
        /// Line number in the source code.
        line:    usize,
    },
    /// A parenthesized expression.
    Grouping {
        /// The inner expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A call expression (e.g. `f(x, y)`).
    Call {
        /// The expression producing the callee.
        callee:    Box<Self>,
        /// Arguments; `None` marks an empty slot such as `f(1,,2)`.
        arguments: Vec<Option<Self>>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Property read: `object.name` or `object[key]`.
    Get {
        /// The expression producing the holder.
        object: Box<Self>,
        /// The property being read.
        member: Member,
        /// Line number in the source code.
        line:   usize,
    },
    /// Property write: `object.name = value` or `object[key] = value`.
    Set {
        /// The expression producing the holder.
        object: Box<Self>,
        /// The property being written.
        member: Member,
        /// The value being written.
        value:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// Array literal (e.g. `[1, 2, 3]`); `None` marks a sparse slot.
    Array {
        /// Elements of the array.
        elements: Vec<Option<Self>>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Object literal (e.g. `{a: 1, b: 2}`).
    Object {
        /// Key and value expression pairs in source order.
        entries: Vec<(String, Self)>,
        /// Line number in the source code.
        line:    usize,
    },
    /// A function used as a value.
    Function {
        /// The function declaration.
        decl: Rc<FunctionDecl>,
        /// Line number in the source code.
        line: usize,
    },
    /// A class used as a value.
    Class {
        /// The class declaration.
        decl: Rc<ClassDecl>,
        /// Line number in the source code.
        line: usize,
    },
    /// `new` wrapped around a call expression.
    New {
        /// The wrapped expression; must be a call to be valid at runtime.
        call: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
}

impl Expr {
    /// Returns the source line the expression started on.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Variable { line, .. }
            | Self::Assign { line, .. }
            | Self::Binary { line, .. }
            | Self::Logical { line, .. }
            | Self::Unary { line, .. }
            | Self::Postfix { line, .. }
            | Self::Grouping { line, .. }
            | Self::Call { line, .. }
            | Self::Get { line, .. }
            | Self::Set { line, .. }
            | Self::Array { line, .. }
            | Self::Object { line, .. }
            | Self::Function { line, .. }
            | Self::Class { line, .. }
            | Self::New { line, .. } => *line,
        }
    }
}

/// An abstract syntax tree (AST) node representing a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A braced sequence of statements with its own scope.
    Block {
        /// The statements in order.
        statements: Vec<Self>,
        /// Line number in the source code.
        line:       usize,
    },
    /// `var name [= initializer];`
    Var {
        /// Name of the variable.
        name:        String,
        /// Initial value, `null` when absent.
        initializer: Option<Expr>,
        /// Line number in the source code.
        line:        usize,
    },
    /// A named function declaration, bound in the enclosing scope.
    Function {
        /// The function declaration.
        decl: Rc<FunctionDecl>,
    },
    /// A named class declaration, bound in the enclosing scope.
    Class {
        /// The class declaration.
        decl: Rc<ClassDecl>,
    },
    /// `if (condition) then_branch [else else_branch]`
    If {
        /// The condition.
        condition:   Expr,
        /// Statement run when the condition is truthy.
        then_branch: Box<Self>,
        /// Statement run otherwise.
        else_branch: Option<Box<Self>>,
        /// Line number in the source code.
        line:        usize,
    },
    /// `while (condition) body`; `for` and `do-while` desugar into this.
    While {
        /// The loop condition.
        condition: Expr,
        /// The loop body.
        body:      Box<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `return [value];`
    Return {
        /// The returned value, `null` when absent.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// An expression evaluated for its value or side effects.
    Expression {
        /// The expression.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
}

/// Supported binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or string concatenation (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Remainder (`%`).
    Mod,
    /// Exponentiation (`**`).
    Pow,
    /// Bitwise and (`&`).
    BitAnd,
    /// Bitwise or (`|`).
    BitOr,
    /// Bitwise xor (`^`).
    BitXor,
    /// Left shift (`<<`).
    Shl,
    /// Arithmetic right shift (`>>`).
    Shr,
    /// Logical right shift (`>>>`).
    UShr,
    /// Loose equality (`==`).
    Equal,
    /// Loose inequality (`!=`).
    NotEqual,
    /// Strict equality (`===`).
    StrictEqual,
    /// Strict inequality (`!==`).
    StrictNotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
}

/// Short-circuiting logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// `&&`
    And,
    /// `||`
    Or,
}

/// Supported unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Numeric negation (`-x`).
    Negate,
    /// Numeric identity (`+x`).
    Plus,
    /// Logical not (`!x`).
    Not,
    /// Bitwise not (`~x`).
    BitNot,
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOperator::{
            Add, BitAnd, BitOr, BitXor, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod,
            Mul, NotEqual, Pow, Shl, Shr, StrictEqual, StrictNotEqual, Sub, UShr,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Pow => "**",
            BitAnd => "&",
            BitOr => "|",
            BitXor => "^",
            Shl => "<<",
            Shr => ">>",
            UShr => ">>>",
            Equal => "==",
            NotEqual => "!=",
            StrictEqual => "===",
            StrictNotEqual => "!==",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Negate => "-",
            Self::Plus => "+",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::Increment => "++",
            Self::Decrement => "--",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            // Debug keeps the fractional part, so `1.0` renders as written.
            Self::Real(r) => write!(f, "{r:?}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, ".{name}"),
            Self::Computed(key) => write!(f, "[{key}]"),
        }
    }
}

/// Writes a comma-separated list where `None` slots render as nothing.
fn write_slots(f: &mut fmt::Formatter<'_>, slots: &[Option<Expr>]) -> fmt::Result {
    for (i, slot) in slots.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        if let Some(expr) = slot {
            write!(f, "{expr}")?;
        }
    }
    Ok(())
}

fn write_statements(f: &mut fmt::Formatter<'_>, statements: &[Stmt]) -> fmt::Result {
    statements.iter().try_for_each(|stmt| write!(f, "{stmt}"))
}

impl FunctionDecl {
    /// Writes `name(params){body}` without the `function` keyword, as used in
    /// class bodies.
    fn fmt_signature(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}")?;
        }
        write!(f, "({}){{", self.params.join(","))?;
        write_statements(f, &self.body)?;
        write!(f, "}}")
    }
}

impl fmt::Display for FunctionDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function")?;
        if self.name.is_some() {
            write!(f, " ")?;
        }
        self.fmt_signature(f)
    }
}

impl fmt::Display for ClassMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static() {
            write!(f, "static ")?;
        }
        match self {
            Self::Field { name,
                          initializer: Some(value),
                          .. } => write!(f, "{name}={value};"),
            Self::Field { name, .. } => write!(f, "{name};"),
            Self::Method { function, .. } => function.fmt_signature(f),
        }
    }
}

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class")?;
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        write!(f, "{{")?;
        for member in &self.members {
            write!(f, "{member}")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::Variable { name, .. } => write!(f, "{name}"),
            Self::Assign { name, value, .. } => write!(f, "{name}={value}"),
            Self::Binary { left, op, right, .. } => write!(f, "{left}{op}{right}"),
            Self::Logical { left, op, right, .. } => write!(f, "{left}{op}{right}"),
            Self::Unary { op, operand, .. } => write!(f, "{op}{operand}"),
            Self::Postfix { op, operand, .. } => write!(f, "{operand}{op}"),
            Self::Grouping { expr, .. } => write!(f, "({expr})"),
            Self::Call { callee, arguments, .. } => {
                write!(f, "{callee}(")?;
                write_slots(f, arguments)?;
                write!(f, ")")
            },
            Self::Get { object, member, .. } => write!(f, "{object}{member}"),
            Self::Set { object,
                        member,
                        value,
                        .. } => write!(f, "{object}{member}={value}"),
            Self::Array { elements, .. } => {
                write!(f, "[")?;
                write_slots(f, elements)?;
                write!(f, "]")
            },
            Self::Object { entries, .. } => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                write!(f, "}}")
            },
            Self::Function { decl, .. } => write!(f, "{decl}"),
            Self::Class { decl, .. } => write!(f, "{decl}"),
            Self::New { call, .. } => write!(f, "new {call}"),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block { statements, .. } => {
                write!(f, "{{")?;
                write_statements(f, statements)?;
                write!(f, "}}")
            },
            Self::Var { name,
                        initializer: Some(value),
                        .. } => write!(f, "var {name}={value};"),
            Self::Var { name, .. } => write!(f, "var {name};"),
            Self::Function { decl } => write!(f, "{decl}"),
            Self::Class { decl } => write!(f, "{decl}"),
            Self::If { condition,
                       then_branch,
                       else_branch,
                       .. } => {
                write!(f, "if({condition}){then_branch}")?;
                match else_branch.as_deref() {
                    Some(block @ Self::Block { .. }) => write!(f, "else{block}"),
                    Some(other) => write!(f, "else {other}"),
                    None => Ok(()),
                }
            },
            Self::While { condition, body, .. } => write!(f, "while({condition}){body}"),
            Self::Return { value: Some(value),
                           .. } => write!(f, "return {value};"),
            Self::Return { .. } => write!(f, "return;"),
            Self::Expression { expr, .. } => write!(f, "{expr};"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i64) -> Expr {
        Expr::Literal { value: value.into(),
                        line:  1, }
    }

    #[test]
    fn expressions_render_without_whitespace() {
        let sum = Expr::Binary { left:  Box::new(Expr::Variable { name: "a".into(),
                                                                  line: 1, }),
                                 op:    BinaryOperator::Add,
                                 right: Box::new(int(2)),
                                 line:  1, };
        assert_eq!(sum.to_string(), "a+2");

        let call = Expr::Call { callee:    Box::new(Expr::Variable { name: "f".into(),
                                                                     line: 1, }),
                                arguments: vec![Some(int(1)), None, Some(int(3))],
                                line:      1, };
        assert_eq!(call.to_string(), "f(1,,3)");
    }

    #[test]
    fn real_literals_keep_their_fraction() {
        let one = Expr::Literal { value: 1.0.into(),
                                  line:  1, };
        assert_eq!(one.to_string(), "1.0");
    }

    #[test]
    fn class_members_render_in_declaration_form() {
        let method = FunctionDecl { name:   Some("method".into()),
                                    params: vec!["a".into()],
                                    body:   vec![Stmt::Return { value: Some(Expr::Literal { value: 1.0.into(),
                                                                                            line:  1, }),
                                                                line:  1, }],
                                    line:   1, };
        let class = ClassDecl { name:    Some("Base".into()),
                                members: vec![ClassMember::Field { name:        "property".into(),
                                                                   initializer: Some(int(1)),
                                                                   is_static:   false,
                                                                   line:        1, },
                                              ClassMember::Method { function:  Rc::new(method),
                                                                    is_static: false, }],
                                line:    1, };
        assert_eq!(Stmt::Class { decl: Rc::new(class) }.to_string(),
                   "class Base{property=1;method(a){return 1.0;}}");
    }
}
