use nabla_source::Token;

/// An expression. Tokens are stored by value; their text borrows the
/// source buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    IntLiteral(Token<'a>),
    FloatLiteral(Token<'a>),
    StringLiteral(Token<'a>),
    /// A variable reference (e.g. `foo`).
    Var(Token<'a>),
    /// A function call (e.g. `foo(1, bar)`). Each argument carries an
    /// optional name token; named arguments are not produced by the
    /// parser yet.
    Call {
        name: Token<'a>,
        args: Vec<(Option<Token<'a>>, Expr<'a>)>,
    },
    /// An additive expression; the op token is `+` or `-`.
    Add {
        left: Box<Expr<'a>>,
        right: Box<Expr<'a>>,
        op: Token<'a>,
    },
    /// A multiplicative expression; the op token is `*` or `/`.
    Mul {
        left: Box<Expr<'a>>,
        right: Box<Expr<'a>>,
        op: Token<'a>,
    },
}

/// A type annotation as written in source: a name plus optional generic
/// arguments (e.g. `vec<3>`). Arguments are parsed but only evaluated for
/// integer literals.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInstance<'a> {
    pub name: Token<'a>,
    pub args: Vec<Expr<'a>>,
}

/// A declaration: a `let` binding, a function parameter or a struct
/// field, depending on where it appears.
#[derive(Debug, Clone, PartialEq)]
pub struct Decl<'a> {
    pub name: Token<'a>,
    pub value: Option<Box<Expr<'a>>>,
    pub immutable: bool,
    pub ty: Option<TypeInstance<'a>>,
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    Print(Vec<Expr<'a>>),
    Decl(Decl<'a>),
    Func {
        name: Token<'a>,
        params: Vec<Decl<'a>>,
        body: Vec<Node<'a>>,
    },
    Struct {
        name: Token<'a>,
        fields: Vec<Decl<'a>>,
    },
    Return {
        keyword: Token<'a>,
        value: Expr<'a>,
    },
}

/// The parsed file. Built once by the parser and immutable afterwards;
/// later passes attach their results in a side table keyed by node
/// address, so the tree must stay in place until the pipeline finishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntaxTree<'a> {
    pub nodes: Vec<Node<'a>>,
}
