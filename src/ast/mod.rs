/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Node identities and the program root
/// - expressions: Expression nodes and operator enums
/// - statements: Statement nodes
pub mod ast;
pub mod expressions;
pub mod statements;
