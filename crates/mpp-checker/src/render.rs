//! Declaration signatures for diagnostic messages.
//!
//! ```text
//! public expect fun <T : kotlin.Comparable<T>> app.max(a: T, b: T): T
//! public final actual class app.Box<out T> : app.Container<T>
//! ```

use mpp_model::{
    CallableKind, ClassKind, ClassModifiers, DeclId, Declaration, DeclarationKind,
    DeclarationStore, FunctionModifiers, Modality, PropertyModifiers, TypeParamId, Variance,
};
use mpp_solver::TypeFormatter;

pub struct DeclarationRenderer<'a> {
    store: &'a DeclarationStore,
    types: TypeFormatter<'a>,
}

impl<'a> DeclarationRenderer<'a> {
    pub const fn new(store: &'a DeclarationStore) -> Self {
        DeclarationRenderer {
            store,
            types: TypeFormatter::new(store),
        }
    }

    pub fn render(&self, id: DeclId) -> String {
        let decl = self.store.decl(id);
        let mut out = String::new();
        out.push_str(decl.visibility.keyword());
        out.push(' ');

        match &decl.kind {
            DeclarationKind::Class(class) => {
                if class.class_kind != ClassKind::Interface || decl.modality != Modality::Abstract {
                    out.push_str(decl.modality.keyword());
                    out.push(' ');
                }
                self.push_status(&mut out, decl);
                for (flag, keyword) in [
                    (ClassModifiers::COMPANION, "companion "),
                    (ClassModifiers::INNER, "inner "),
                    (ClassModifiers::INLINE, "inline "),
                ] {
                    if class.modifiers.contains(flag) {
                        out.push_str(keyword);
                    }
                }
                out.push_str(class.class_kind.keyword());
                out.push(' ');
                out.push_str(self.store.resolve(decl.fq_name));
                self.push_type_params(&mut out, &decl.type_params);
                for (i, &supertype) in class.supertypes.iter().enumerate() {
                    out.push_str(if i == 0 { " : " } else { ", " });
                    out.push_str(&self.types.format(supertype));
                }
            }
            DeclarationKind::TypeAlias(alias) => {
                self.push_status(&mut out, decl);
                out.push_str("typealias ");
                out.push_str(self.store.resolve(decl.fq_name));
                self.push_type_params(&mut out, &decl.type_params);
                out.push_str(" = ");
                out.push_str(&self.types.format(alias.expanded));
            }
            DeclarationKind::Callable(callable) => {
                if decl.modality != Modality::Final {
                    out.push_str(decl.modality.keyword());
                    out.push(' ');
                }
                self.push_status(&mut out, decl);
                match callable.kind {
                    CallableKind::Function { modifiers } => {
                        push_function_modifiers(&mut out, modifiers);
                        out.push_str("fun ");
                    }
                    CallableKind::Constructor { .. } => out.push_str("constructor "),
                    CallableKind::Property { is_var, modifiers } => {
                        if modifiers.contains(PropertyModifiers::CONST) {
                            out.push_str("const ");
                        }
                        if modifiers.contains(PropertyModifiers::LATEINIT) {
                            out.push_str("lateinit ");
                        }
                        out.push_str(if is_var { "var " } else { "val " });
                    }
                }
                if !decl.type_params.is_empty() {
                    self.push_type_params(&mut out, &decl.type_params);
                    out.push(' ');
                }
                if let Some(receiver) = callable.receiver {
                    out.push_str(&self.types.format(receiver));
                    out.push('.');
                }
                out.push_str(self.callable_name(decl));

                if matches!(callable.kind, CallableKind::Property { .. }) {
                    out.push_str(": ");
                } else {
                    out.push('(');
                    for (i, param) in callable.value_params.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        if param.is_vararg {
                            out.push_str("vararg ");
                        }
                        if param.is_noinline {
                            out.push_str("noinline ");
                        }
                        if param.is_crossinline {
                            out.push_str("crossinline ");
                        }
                        out.push_str(self.store.resolve(param.name));
                        out.push_str(": ");
                        out.push_str(&self.types.format(param.ty));
                        if param.has_default() {
                            out.push_str(" = ...");
                        }
                    }
                    out.push_str("): ");
                }
                out.push_str(&self.types.format(callable.return_type));
            }
        }
        out
    }

    /// Constructors render under their class name.
    fn callable_name(&self, decl: &Declaration) -> &'a str {
        match (&decl.kind, decl.container) {
            (
                DeclarationKind::Callable(callable),
                Some(owner),
            ) if matches!(callable.kind, CallableKind::Constructor { .. }) => {
                self.store.resolve(self.store.decl(owner).name)
            }
            _ => self.store.resolve(decl.fq_name),
        }
    }

    fn push_status(&self, out: &mut String, decl: &Declaration) {
        if decl.is_expect() {
            out.push_str("expect ");
        }
        if decl.has_actual_modifier() {
            out.push_str("actual ");
        }
    }

    fn push_type_params(&self, out: &mut String, params: &[TypeParamId]) {
        if params.is_empty() {
            return;
        }
        out.push('<');
        for (i, &id) in params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let param = self.store.type_param(id);
            if param.is_reified {
                out.push_str("reified ");
            }
            if param.variance != Variance::Invariant {
                out.push_str(param.variance.keyword());
                out.push(' ');
            }
            out.push_str(self.store.resolve(param.name));
            if let [bound] = param.upper_bounds.as_slice() {
                out.push_str(" : ");
                out.push_str(&self.types.format(*bound));
            }
        }
        out.push('>');
    }
}

fn push_function_modifiers(out: &mut String, modifiers: FunctionModifiers) {
    for (flag, keyword) in [
        (FunctionModifiers::EXTERNAL, "external "),
        (FunctionModifiers::TAILREC, "tailrec "),
        (FunctionModifiers::INLINE, "inline "),
        (FunctionModifiers::INFIX, "infix "),
        (FunctionModifiers::OPERATOR, "operator "),
        (FunctionModifiers::SUSPEND, "suspend "),
    ] {
        if modifiers.contains(flag) {
            out.push_str(keyword);
        }
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
