//! Flat AST for Quill build files.
//!
//! The parser allocates every node into an `AstArena` and links nodes by
//! index. The evaluator only ever reads the arena.
//!
//! Quill files are sequences of statements: assignments (`x = ...`,
//! `x += ...`, `x -= ...`), `if`/`else` chains, and calls. Calls may carry a
//! trailing `{ ... }` block (`template("t") { ... }`, `group("g") { ... }`).

use std::fmt;

use crate::{Name, Span};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create from a raw arena index.
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Index into the arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    /// Index of an expression in the arena.
    ExprId
);
define_id!(
    /// Index of a statement in the arena.
    StmtId
);
define_id!(
    /// Index of a `{ ... }` block in the arena.
    BlockId
);

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// `!`
    Not,
}

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Eq,
    NotEq,
    And,
    Or,
}

impl BinaryOp {
    /// Source spelling of the operator.
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// Assignment operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubAssign,
}

impl AssignOp {
    /// Source spelling of the operator.
    pub fn as_symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
        }
    }
}

/// A function call, optionally followed by a block.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Call {
    /// Called function (built-in, template or target kind).
    pub func: Name,
    /// Positional arguments, unevaluated.
    pub args: Vec<ExprId>,
    /// Trailing `{ ... }` block, if any.
    pub block: Option<BlockId>,
}

/// Expression node kinds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    Bool(bool),
    Int(i64),
    /// String literal (interned contents).
    Str(Name),
    /// Bare identifier.
    Ident(Name),
    /// `[a, b, c]`
    List(Vec<ExprId>),
    /// `{"key": value, ...}`, a string-keyed map.
    Map(Vec<(Name, ExprId)>),
    /// `{ a = 1 }`, a block evaluated into a scope value.
    ScopeLit(BlockId),
    /// `base.member`, where `base` must name a scope.
    Accessor { base: Name, member: Name },
    Unary { op: UnaryOp, operand: ExprId },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Call(Call),
}

/// An expression with its source location.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// The identifier this expression consists of, if it is a bare name.
    pub fn as_ident(&self) -> Option<Name> {
        match self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

/// Statement node kinds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// `target op value`
    Assign {
        target: Name,
        op: AssignOp,
        value: ExprId,
    },
    /// A call evaluated for its effect.
    Expr(ExprId),
    /// `if (condition) { ... } else { ... }`
    ///
    /// `else if` is an else block holding a single `If` statement.
    If {
        condition: ExprId,
        then_block: BlockId,
        else_block: Option<BlockId>,
    },
}

/// A statement with its source location.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// A `{ ... }` block, or the top level of a file.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Block {
    pub stmts: Vec<StmtId>,
    pub span: Span,
}

/// Arena holding every node of one parsed file.
///
/// The `alloc_*` methods take explicit spans and are what a parser uses. The
/// shorthand constructors (`ident`, `string`, `call`, `assign`, ...) are for
/// building trees programmatically; they give each node the next one-byte
/// synthetic span, so source order equals construction order.
#[derive(Clone, Debug, Default)]
pub struct AstArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    blocks: Vec<Block>,
    next_offset: u32,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(len: usize) -> u32 {
        u32::try_from(len).unwrap_or_else(|_| panic!("AST arena exceeded u32::MAX nodes"))
    }

    /// Allocate an expression.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(Self::next_id(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// Allocate a statement.
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(Self::next_id(self.stmts.len()));
        self.stmts.push(stmt);
        id
    }

    /// Allocate a block.
    pub fn alloc_block(&mut self, block: Block) -> BlockId {
        let id = BlockId::new(Self::next_id(self.blocks.len()));
        self.blocks.push(block);
        id
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    /// Number of expressions allocated.
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    fn synthetic_span(&mut self) -> Span {
        let start = self.next_offset;
        self.next_offset = self.next_offset.saturating_add(1);
        Span::new(start, self.next_offset)
    }

    fn synth_expr(&mut self, kind: ExprKind) -> ExprId {
        let span = self.synthetic_span();
        self.alloc_expr(Expr::new(kind, span))
    }

    fn synth_stmt(&mut self, kind: StmtKind) -> StmtId {
        let span = self.synthetic_span();
        self.alloc_stmt(Stmt { kind, span })
    }

    pub fn bool_lit(&mut self, value: bool) -> ExprId {
        self.synth_expr(ExprKind::Bool(value))
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.synth_expr(ExprKind::Int(value))
    }

    pub fn string(&mut self, value: Name) -> ExprId {
        self.synth_expr(ExprKind::Str(value))
    }

    pub fn ident(&mut self, name: Name) -> ExprId {
        self.synth_expr(ExprKind::Ident(name))
    }

    pub fn list(&mut self, items: Vec<ExprId>) -> ExprId {
        self.synth_expr(ExprKind::List(items))
    }

    pub fn map(&mut self, entries: Vec<(Name, ExprId)>) -> ExprId {
        self.synth_expr(ExprKind::Map(entries))
    }

    pub fn scope_lit(&mut self, block: BlockId) -> ExprId {
        self.synth_expr(ExprKind::ScopeLit(block))
    }

    pub fn accessor(&mut self, base: Name, member: Name) -> ExprId {
        self.synth_expr(ExprKind::Accessor { base, member })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.synth_expr(ExprKind::Unary { op, operand })
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.synth_expr(ExprKind::Binary { op, left, right })
    }

    pub fn call(&mut self, func: Name, args: Vec<ExprId>, block: Option<BlockId>) -> ExprId {
        self.synth_expr(ExprKind::Call(Call { func, args, block }))
    }

    pub fn assign(&mut self, target: Name, op: AssignOp, value: ExprId) -> StmtId {
        self.synth_stmt(StmtKind::Assign { target, op, value })
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.synth_stmt(StmtKind::Expr(expr))
    }

    pub fn if_stmt(
        &mut self,
        condition: ExprId,
        then_block: BlockId,
        else_block: Option<BlockId>,
    ) -> StmtId {
        self.synth_stmt(StmtKind::If {
            condition,
            then_block,
            else_block,
        })
    }

    /// Allocate a block; its span covers its statements.
    pub fn block_of(&mut self, stmts: Vec<StmtId>) -> BlockId {
        let span = stmts
            .iter()
            .map(|&id| self.stmt(id).span)
            .reduce(Span::merge)
            .unwrap_or_else(|| self.synthetic_span());
        self.alloc_block(Block { stmts, span })
    }
}
