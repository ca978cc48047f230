//! Node types for the syscall description language
//!
//! Only the subset of the language that the extraction tool emits (and that
//! the generated file needs) is modeled. Equality and ordering are structural
//! so that nodes can serve as a final, order-independent sort key.

use std::fmt;

/// A type expression: `ptr[in, msghdr_auto[cmd, policy]]`, `int32:3`, `"name"`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Type {
    /// Identifier, integer literal or quoted string
    pub value: String,
    /// Bracketed template arguments
    pub args: Vec<Type>,
    /// `:`-separated suffixes (bitfield widths, ranges)
    pub colon: Vec<Type>,
}

impl Type {
    /// Create a bare type with no arguments
    pub fn ident(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            args: Vec::new(),
            colon: Vec::new(),
        }
    }

    /// Create a type with template arguments
    pub fn with_args(value: impl Into<String>, args: Vec<Type>) -> Self {
        Self {
            value: value.into(),
            args,
            colon: Vec::new(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)?;
        if !self.args.is_empty() {
            f.write_str("[")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str("]")?;
        }
        for suffix in &self.colon {
            write!(f, ":{}", suffix)?;
        }
        Ok(())
    }
}

/// A named argument or struct field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.ty)
    }
}

/// Syscall declaration: `sendmsg$nl(fd sock, msg ptr[in, msghdr], f flags[send_flags]) ret`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Call {
    /// Exposed name, including any `$variant` suffix
    pub name: String,
    /// Entry point the declaration resolves to (the part before `$` when parsed)
    pub call_name: String,
    pub args: Vec<Field>,
    pub ret: Option<Type>,
}

impl Call {
    /// Create a call, deriving the entry point from the exposed name
    pub fn new(name: impl Into<String>, args: Vec<Field>, ret: Option<Type>) -> Self {
        let name = name.into();
        let call_name = name.split('$').next().unwrap_or_default().to_string();
        Self {
            name,
            call_name,
            args,
            ret,
        }
    }
}

/// Struct (`name { ... }`) or union (`name [ ... ]`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Struct {
    pub name: String,
    pub fields: Vec<Field>,
    pub is_union: bool,
    /// Trailing attributes such as `[packed]` or `[varlen]`
    pub attrs: Vec<Type>,
}

/// `include <path>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Include {
    pub file: String,
}

/// `resource name[base]: v1, v2`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Resource {
    pub name: String,
    pub base: Type,
    pub values: Vec<String>,
}

/// `type name[P1, P2] Type`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeDef {
    pub name: String,
    pub params: Vec<String>,
    pub ty: Type,
}

/// `name = v1, v2`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Flags {
    pub name: String,
    pub values: Vec<String>,
}

/// `#text`, stored without the leading `#`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Comment {
    pub text: String,
}

/// One top-level declaration
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    Comment(Comment),
    NewLine,
    Include(Include),
    Resource(Resource),
    TypeDef(TypeDef),
    Flags(Flags),
    Call(Call),
    Struct(Struct),
}

/// An ordered sequence of top-level nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Description {
    pub nodes: Vec<Node>,
}
