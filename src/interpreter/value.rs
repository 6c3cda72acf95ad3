/// Indexing, attribute lookup and iteration.
///
/// Implements `get_index`, `get_attribute` and the element view used by
/// `for` loops, each raising the error kind a user would expect
/// (`IndexError`, `AttributeError`, ...) when the value does not support the
/// access.
pub mod access;
/// The value type and its kinds.
///
/// Defines [`core::Value`], its payload enum, the [`core::Kind`] tags shown
/// to users, provenance tracking through [`core::Origin`], and the
/// homogeneous-collection constructors.
pub mod core;
/// Dictionary storage.
///
/// Defines the hashable [`dict_key::DictKey`] projection of a value and the
/// insertion-ordered [`dict_key::Dictionary`] built on top of it.
pub mod dict_key;
/// Human readable formatting of values.
pub mod display;
/// User functions and module namespaces.
pub mod function;
/// Operator dispatch.
///
/// One method per operator, each matching exhaustively over the operand kinds
/// and falling back to an `OperationError` naming both kinds.
pub mod ops;
