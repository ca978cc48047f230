//! Declaration collection and classification
//!
//! Parses each extraction result and buckets its nodes by kind. The
//! coordinator thread owns the [`Declarations`] value; nothing here is shared
//! with workers.

use crate::description::{self, Call, Include, Node, Resource, Struct, TypeDef};
use crate::dispatcher::ExtractionResult;
use crate::error::{DeclExtractError, Result};

/// Declarations gathered from every translation unit, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    pub syscalls: Vec<Call>,
    /// Netlink policies (structs and unions)
    pub netlinks: Vec<Struct>,
    pub includes: Vec<Include>,
    pub type_defs: Vec<TypeDef>,
    pub resources: Vec<Resource>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one extraction result into the buckets
    ///
    /// A failed result or unparsable output aborts the pipeline.
    pub fn collect(&mut self, result: ExtractionResult) -> Result<()> {
        if result.failed() {
            return Err(DeclExtractError::Subprocess(result.stderr));
        }
        if result.stdout.is_empty() {
            return Ok(());
        }
        let desc = description::parse(&result.stdout)?;
        for node in desc.nodes {
            self.classify(node);
        }
        Ok(())
    }

    /// Put one node into its bucket
    pub fn classify(&mut self, node: Node) {
        match node {
            Node::Call(call) => self.syscalls.push(call),
            Node::Struct(s) => self.netlinks.push(s),
            Node::Include(inc) => self.includes.push(inc),
            Node::TypeDef(td) => self.type_defs.push(td),
            Node::Resource(res) => self.resources.push(res),
            Node::NewLine | Node::Comment(_) | Node::Flags(_) => {}
        }
    }

    /// Total number of collected declarations
    pub fn len(&self) -> usize {
        self.syscalls.len()
            + self.netlinks.len()
            + self.includes.len()
            + self.type_defs.len()
            + self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
