//! Syscall description language: nodes, parser and canonical formatter
//!
//! Covers the declarations the extraction tool emits (calls, structs and
//! unions, includes, type definitions, resources) plus the comment, flags
//! and blank-line nodes the generated file uses.

pub mod ast;
mod format;
mod parser;

pub use ast::{
    Call, Comment, Description, Field, Flags, Include, Node, Resource, Struct, Type, TypeDef,
};
pub use format::format;
pub use parser::parse;
