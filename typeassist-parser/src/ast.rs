// TypeAssist AST Definitions
// Syntax tree nodes with spans and verbatim text where the resolver needs it

/// Source position information for AST nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub start_line_col: Option<(usize, usize)>,
    pub end_line_col: Option<(usize, usize)>,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            start_line_col: None,
            end_line_col: None,
        }
    }

    pub fn with_line_col(
        start: usize,
        end: usize,
        start_line_col: (usize, usize),
        end_line_col: (usize, usize),
    ) -> Self {
        Self {
            start,
            end,
            start_line_col: Some(start_line_col),
            end_line_col: Some(end_line_col),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inclusive of the end offset so a cursor placed right after a token still hits it.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn encloses(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::new(span.start.into(), span.len())
    }
}

/// Debug information for tooling
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DebugInfo {
    pub source_file: Option<String>,
}

impl DebugInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_file(source_file: Option<String>) -> Self {
        Self { source_file }
    }
}

/// Top-level program containing all statements
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub debug_info: DebugInfo,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Variable(VariableStatement),
    Function(FunctionDeclaration),
    Interface(InterfaceDeclaration),
    TypeAlias(TypeAliasDeclaration),
    Import(ImportDeclaration),
    Export(ExportStatement),
    Return(Option<Expression>),
    If(IfStatement),
    While(WhileStatement),
    For(ForStatement),
    Throw(Expression),
    Block(Block),
    Expression(Expression),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Const,
    Let,
    Var,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Const => "const",
            DeclarationKind::Let => "let",
            DeclarationKind::Var => "var",
        }
    }
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableStatement {
    pub kind: DeclarationKind,
    pub declarators: Vec<VariableDeclarator>,
    pub exported: bool,
    pub declared: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub name: BindingName,
    pub type_annotation: Option<TypeAnnotation>,
    pub initializer: Option<Expression>,
    pub span: Span,
}

/// Either a plain name or a destructuring pattern kept as text
#[derive(Debug, Clone, PartialEq)]
pub enum BindingName {
    Identifier(Identifier),
    Pattern { text: String, span: Span },
}

impl BindingName {
    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            BindingName::Identifier(identifier) => Some(identifier),
            BindingName::Pattern { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: Identifier,
    pub type_parameters: Option<TypeParameters>,
    pub parameters: ParameterList,
    pub return_type: Option<TypeAnnotation>,
    pub body: Option<Block>,
    pub is_async: bool,
    pub exported: bool,
    pub declared: bool,
    pub span: Span,
}

/// Parenthesised parameter list; `text` is the verbatim source including the parentheses
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterList {
    pub parameters: Vec<Parameter>,
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: BindingName,
    pub optional: bool,
    pub rest: bool,
    pub type_annotation: Option<TypeAnnotation>,
    pub default: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameters {
    pub parameters: Vec<TypeParameter>,
    pub span: Span,
}

impl TypeParameters {
    pub fn names(&self) -> Vec<String> {
        self.parameters
            .iter()
            .map(|parameter| parameter.name.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    pub name: Identifier,
    pub constraint: Option<TypeAnnotation>,
    pub default: Option<TypeAnnotation>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeArguments {
    pub arguments: Vec<TypeAnnotation>,
    pub text: String,
    pub span: Span,
}

impl TypeArguments {
    pub fn texts(&self) -> Vec<String> {
        self.arguments
            .iter()
            .map(|argument| argument.text.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDeclaration {
    pub name: Identifier,
    pub type_parameters: Option<TypeParameters>,
    pub extends: Vec<TypeAnnotation>,
    pub body: ObjectType,
    pub exported: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDeclaration {
    pub name: Identifier,
    pub type_parameters: Option<TypeParameters>,
    pub type_annotation: TypeAnnotation,
    pub exported: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    pub specifier: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportStatement {
    Clause { text: String, span: Span },
    Default { expression: Expression, span: Span },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

/// The loop header is kept verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub header: String,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

// Types

/// A type as written in source; `text` is verbatim and `kind` its structure
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub kind: TypeKind,
    pub text: String,
    pub span: Span,
}

impl TypeAnnotation {
    /// Strip any number of enclosing parentheses
    pub fn unparenthesized(&self) -> &TypeAnnotation {
        match &self.kind {
            TypeKind::Parenthesized(inner) => inner.unparenthesized(),
            _ => self,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match &self.unparenthesized().kind {
            TypeKind::Function(function_type) => Some(function_type),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Reference {
        name: String,
        arguments: Option<TypeArguments>,
    },
    Function(FunctionType),
    Constructor(FunctionType),
    Object(ObjectType),
    Tuple(Vec<TypeAnnotation>),
    Array(Box<TypeAnnotation>),
    IndexedAccess {
        object: Box<TypeAnnotation>,
        index: Box<TypeAnnotation>,
    },
    Union(Vec<TypeAnnotation>),
    Intersection(Vec<TypeAnnotation>),
    Parenthesized(Box<TypeAnnotation>),
    Literal(String),
    Query(String),
    Operator {
        operator: TypeOperator,
        operand: Box<TypeAnnotation>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOperator {
    Keyof,
    Unique,
    Readonly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub type_parameters: Option<TypeParameters>,
    pub parameters: ParameterList,
    pub return_type: Box<TypeAnnotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub members: Vec<TypeMember>,
    pub span: Span,
}

impl ObjectType {
    pub fn member(&self, name: &str) -> Option<&TypeMember> {
        self.members.iter().find(|member| member.name() == Some(name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeMember {
    Property(PropertySignature),
    Method(MethodSignature),
    Index(IndexSignature),
}

impl TypeMember {
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeMember::Property(property) => Some(&property.name.name),
            TypeMember::Method(method) => Some(&method.name.name),
            TypeMember::Index(_) => None,
        }
    }
}

/// Member name with any string quotes removed
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyName {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySignature {
    pub name: PropertyName,
    pub optional: bool,
    pub readonly: bool,
    pub type_annotation: Option<TypeAnnotation>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub name: PropertyName,
    pub optional: bool,
    pub type_parameters: Option<TypeParameters>,
    pub parameters: ParameterList,
    pub return_type: Option<TypeAnnotation>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexSignature {
    pub key: Identifier,
    pub key_type: TypeAnnotation,
    pub value_type: TypeAnnotation,
    pub readonly: bool,
    pub span: Span,
}

// Expressions

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    /// Strip enclosing parentheses
    pub fn unparenthesized(&self) -> &Expression {
        match &self.kind {
            ExpressionKind::Parenthesized(inner) => inner.unparenthesized(),
            _ => self,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Identifier(Identifier),
    This,
    Null,
    Boolean(bool),
    Number(String),
    String(StringLiteral),
    Template(String),
    Array(Vec<Expression>),
    Object(ObjectLiteral),
    Spread(Box<Expression>),
    Call(CallExpression),
    Member(MemberExpression),
    Index(IndexExpression),
    NonNull(Box<Expression>),
    Arrow(ArrowFunction),
    Function(FunctionExpression),
    Unary(UnaryOperation),
    Binary(BinaryOperation),
    Conditional(ConditionalExpression),
    Assignment(AssignmentExpression),
    TypeAssertion(TypeAssertion),
    Parenthesized(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLiteral {
    pub members: Vec<ObjectMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    Property {
        key: PropertyKey,
        value: Expression,
        span: Span,
    },
    Shorthand(Identifier),
    Method(ObjectMethod),
    Spread(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Named(PropertyName),
    Computed(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMethod {
    pub name: PropertyName,
    pub type_parameters: Option<TypeParameters>,
    pub parameters: ParameterList,
    pub return_type: Option<TypeAnnotation>,
    pub body: Block,
    pub is_async: bool,
    pub span: Span,
}

/// One application `callee<T>(args)`; `arguments.text` keeps the parentheses
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub type_arguments: Option<TypeArguments>,
    pub arguments: ArgumentList,
    pub optional: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentList {
    pub arguments: Vec<Expression>,
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: Identifier,
    pub optional: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub object: Box<Expression>,
    pub index: Box<Expression>,
    pub optional: bool,
    pub span: Span,
}

/// Arrow function with its verbatim source text
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    pub type_parameters: Option<TypeParameters>,
    pub parameters: ParameterList,
    pub return_type: Option<TypeAnnotation>,
    pub body: ArrowBody,
    pub is_async: bool,
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Block(Block),
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
    pub name: Option<Identifier>,
    pub type_parameters: Option<TypeParameters>,
    pub parameters: ParameterList,
    pub return_type: Option<TypeAnnotation>,
    pub body: Block,
    pub is_async: bool,
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperation {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Increment,
    Decrement,
    LogicalNot,
    BitwiseNot,
    Plus,
    Minus,
    Typeof,
    Void,
    Delete,
    Await,
    New,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperation {
    pub left: Box<Expression>,
    pub operator: BinaryOperator,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    StrictEqual,
    StrictNotEqual,
    Equal,
    NotEqual,
    Nullish,
    LogicalAnd,
    LogicalOr,
    Exponent,
    Multiply,
    Divide,
    Modulo,
    Add,
    Subtract,
    UnsignedShiftRight,
    ShiftLeft,
    ShiftRight,
    LessEqual,
    GreaterEqual,
    Less,
    Greater,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    Instanceof,
    In,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::StrictEqual => "===",
            BinaryOperator::StrictNotEqual => "!==",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Nullish => "??",
            BinaryOperator::LogicalAnd => "&&",
            BinaryOperator::LogicalOr => "||",
            BinaryOperator::Exponent => "**",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::UnsignedShiftRight => ">>>",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseXor => "^",
            BinaryOperator::Instanceof => "instanceof",
            BinaryOperator::In => "in",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    pub condition: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    pub target: Box<Expression>,
    pub operator: String,
    pub value: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionKind {
    As,
    Satisfies,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAssertion {
    pub expression: Box<Expression>,
    pub kind: AssertionKind,
    pub type_annotation: TypeAnnotation,
    pub span: Span,
}
