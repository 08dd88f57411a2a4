//! Type rendering for diagnostics.

use crate::recursion::{DepthCounter, RecursionProfile};
use mpp_model::{DeclarationStore, TypeArgument, TypeData, TypeId};

/// Renders types as `kotlin.collections.List<out T>?`.
pub struct TypeFormatter<'a> {
    store: &'a DeclarationStore,
    short_names: bool,
}

impl<'a> TypeFormatter<'a> {
    pub const fn new(store: &'a DeclarationStore) -> Self {
        Self {
            store,
            short_names: false,
        }
    }

    /// Drop package qualifiers (`List<out T>?`).
    pub const fn with_short_names(mut self, short_names: bool) -> Self {
        self.short_names = short_names;
        self
    }

    pub fn format(&self, ty: TypeId) -> String {
        let mut out = String::new();
        let mut depth = DepthCounter::with_profile(RecursionProfile::TypeStructure);
        self.write_type(&mut out, ty, &mut depth);
        out
    }

    fn write_type(&self, out: &mut String, ty: TypeId, depth: &mut DepthCounter) {
        if !depth.enter() {
            out.push_str("...");
            return;
        }
        match &*self.store.types().lookup(ty) {
            TypeData::Error => out.push_str("<error>"),
            TypeData::TypeParameter { param, nullable } => {
                out.push_str(self.store.resolve(self.store.type_param(*param).name));
                if *nullable {
                    out.push('?');
                }
            }
            TypeData::Class {
                fq_name,
                args,
                nullable,
            } => {
                let name = self.store.resolve(*fq_name);
                let name = if self.short_names {
                    name.rsplit('.').next().unwrap_or(name)
                } else {
                    name
                };
                out.push_str(name);
                if !args.is_empty() {
                    out.push('<');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        match *arg {
                            TypeArgument::Star => out.push('*'),
                            TypeArgument::Invariant(inner) => self.write_type(out, inner, depth),
                            TypeArgument::Out(inner) => {
                                out.push_str("out ");
                                self.write_type(out, inner, depth);
                            }
                            TypeArgument::In(inner) => {
                                out.push_str("in ");
                                self.write_type(out, inner, depth);
                            }
                        }
                    }
                    out.push('>');
                }
                if *nullable {
                    out.push('?');
                }
            }
        }
        depth.leave();
    }

    /// Parenthesised, comma-separated list: `(kotlin.Int, T?)`.
    pub fn format_list(&self, types: &[TypeId]) -> String {
        let mut out = String::from("(");
        for (i, &ty) in types.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&self.format(ty));
        }
        out.push(')');
        out
    }
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
