//! Canonical text serialization for descriptions
//!
//! Output rules: one declaration per line, a blank line after every struct
//! or union, and never more than one blank line in a row. Parsing the output
//! and formatting it again reproduces it exactly.

use super::ast::{Description, Node, Struct};
use std::fmt::Write;

/// Serialize a description to text
pub fn format(desc: &Description) -> String {
    let mut out = String::new();
    // Whether the last emitted line was blank
    let mut blank = false;
    for node in &desc.nodes {
        match node {
            Node::NewLine => {
                if !blank && !out.is_empty() {
                    out.push('\n');
                    blank = true;
                }
                continue;
            }
            Node::Comment(c) => {
                let _ = writeln!(out, "#{}", c.text);
            }
            Node::Include(inc) => {
                let _ = writeln!(out, "include <{}>", inc.file);
            }
            Node::Resource(res) => {
                let _ = write!(out, "resource {}[{}]", res.name, res.base);
                if !res.values.is_empty() {
                    let _ = write!(out, ": {}", res.values.join(", "));
                }
                out.push('\n');
            }
            Node::TypeDef(td) => {
                let _ = write!(out, "type {}", td.name);
                if !td.params.is_empty() {
                    let _ = write!(out, "[{}]", td.params.join(", "));
                }
                let _ = writeln!(out, " {}", td.ty);
            }
            Node::Flags(flags) => {
                let _ = writeln!(out, "{} = {}", flags.name, flags.values.join(", "));
            }
            Node::Call(call) => {
                let args: Vec<String> = call.args.iter().map(ToString::to_string).collect();
                let _ = write!(out, "{}({})", call.name, args.join(", "));
                if let Some(ret) = &call.ret {
                    let _ = write!(out, " {}", ret);
                }
                out.push('\n');
            }
            Node::Struct(s) => {
                format_struct(&mut out, s);
                out.push('\n');
                blank = true;
                continue;
            }
        }
        blank = false;
    }
    out
}

fn format_struct(out: &mut String, s: &Struct) {
    let (open, close) = if s.is_union { ('[', ']') } else { ('{', '}') };
    let _ = writeln!(out, "{} {}", s.name, open);
    for field in &s.fields {
        let _ = writeln!(out, "\t{}", field);
    }
    out.push(close);
    if !s.attrs.is_empty() {
        let attrs: Vec<String> = s.attrs.iter().map(ToString::to_string).collect();
        let _ = write!(out, " [{}]", attrs.join(", "));
    }
    out.push('\n');
}
