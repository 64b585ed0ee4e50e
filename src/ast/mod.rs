/// AST (Abstract Syntax Tree) module
/// Contains the tree produced by the parser
///
/// Submodules:
/// - ast: Program root and structure definitions
/// - expressions: Expression nodes and operators
/// - statements: Statement nodes
/// - types: Type annotations
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
