//! Expect/actual declaration checker.
//!
//! Consumes resolver verdicts for declarations with actual status and turns
//! them into diagnostics:
//!
//! | code | when |
//! |------|------|
//! | 9001 | no compatible expected declaration |
//! | 9002 | compatible expected declaration, but the `actual` keyword is missing |
//! | 9003 | the expected class has members the actual class does not provide |
//! | 9004 | compatible expected declarations in several modules |
//! | 9005 | an annotation parameter default differs between expect and actual |

use crate::ambiguity::find_ambiguous_expects;
use crate::compatibility::{
    Compatibility, CompatibilityMap, Incompatibility, UnfulfilledMember, VerdictMapExt,
};
use crate::context::CheckerOptions;
use crate::render::DeclarationRenderer;
use crate::resolver::{ExpectActualResolver, SharedResolutionCache};
use mpp_common::{Diagnostic, DiagnosticMessage, SourceAnchor, diagnostic_messages};
use mpp_model::{DeclId, Declaration, DeclarationCategory, DeclarationStore};
use mpp_solver::{ExpectActualTypeChecker, TypeEquivalence};
use tracing::{debug, trace};

pub struct ExpectActualChecker<'a, E = ExpectActualTypeChecker> {
    store: &'a DeclarationStore,
    options: CheckerOptions,
    resolver: ExpectActualResolver<'a, E>,
    renderer: DeclarationRenderer<'a>,
}

impl<'a> ExpectActualChecker<'a> {
    pub fn new(store: &'a DeclarationStore, options: CheckerOptions) -> Self {
        let resolver = ExpectActualResolver::new(store, &options);
        Self::with_resolver(store, options, resolver)
    }

    /// A checker whose resolutions go to a cache shared with other threads.
    pub fn with_shared_cache(
        store: &'a DeclarationStore,
        options: CheckerOptions,
        cache: SharedResolutionCache,
    ) -> Self {
        let resolver = ExpectActualResolver::with_shared_cache(store, &options, cache);
        Self::with_resolver(store, options, resolver)
    }
}

impl<'a, E: TypeEquivalence> ExpectActualChecker<'a, E> {
    pub fn with_resolver(
        store: &'a DeclarationStore,
        options: CheckerOptions,
        resolver: ExpectActualResolver<'a, E>,
    ) -> Self {
        ExpectActualChecker {
            store,
            options,
            resolver,
            renderer: DeclarationRenderer::new(store),
        }
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    pub fn resolver(&self) -> &ExpectActualResolver<'a, E> {
        &self.resolver
    }

    /// Check every declaration with actual status.
    pub fn check_all(&self) -> Vec<Diagnostic> {
        self.check_declarations(
            self.store
                .decls()
                .filter(|decl| decl.is_actual())
                .map(|decl| decl.id),
        )
    }

    /// Check `ids`; diagnostics come back ordered by file, offset and code.
    pub fn check_declarations(&self, ids: impl IntoIterator<Item = DeclId>) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = ids
            .into_iter()
            .flat_map(|id| self.check_declaration(id))
            .collect();
        diagnostics.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then(a.start.cmp(&b.start))
                .then(a.code.cmp(&b.code))
        });
        diagnostics
    }

    pub fn check_declaration(&self, id: DeclId) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        if !self.options.multiplatform {
            return diagnostics;
        }
        let decl = self.store.decl(id);
        if !decl.is_actual() {
            return diagnostics;
        }
        let Some(compatibility) = self.resolver.find_expect_for_actual(id) else {
            trace!(decl = %id, "expect lookup does not apply");
            return diagnostics;
        };

        self.check_ambiguous_expects(decl, &compatibility, &mut diagnostics);
        self.check_actual_has_expected(decl, &compatibility, &mut diagnostics);

        if !diagnostics.is_empty() {
            debug!(
                decl = self.store.resolve(decl.fq_name),
                count = diagnostics.len(),
                "expect/actual diagnostics"
            );
        }
        diagnostics
    }

    fn check_ambiguous_expects(
        &self,
        decl: &Declaration,
        compatibility: &CompatibilityMap,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let Some(ambiguous) = find_ambiguous_expects(self.store, compatibility) else {
            return;
        };
        let modules = ambiguous.module_names(self.store).join(", ");
        let diagnostic = self.diagnostic_at(
            &diagnostic_messages::AMBIGUOUS_EXPECTS,
            decl.source,
            &[self.store.describe(decl.id).as_str(), modules.as_str()],
        );
        diagnostics.push(self.with_expected(diagnostic, ambiguous.candidates));
    }

    fn check_actual_has_expected(
        &self,
        decl: &Declaration,
        compatibility: &CompatibilityMap,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let compatible = compatibility.get(&Compatibility::Compatible);

        if !decl.has_actual_modifier() {
            // Every candidate differs in shape: an unrelated declaration.
            if compatibility.all_strong() {
                return;
            }
            if let Some(expected) = compatible {
                if self.requires_actual_modifier(decl) {
                    let diagnostic =
                        self.diagnostic_at(&diagnostic_messages::ACTUAL_MISSING, decl.source, &[]);
                    diagnostics.push(self.with_expected(diagnostic, expected.iter().copied()));
                }
                return;
            }
        }

        let first = compatibility.keys().next();
        if let Some(Compatibility::Incompatible(Incompatibility::ClassScopes(unfulfilled))) = first
        {
            self.report_unfulfilled_members(decl, unfulfilled, diagnostics);
        } else if compatible.is_none() {
            let subject = format!("Actual {}", self.store.describe(decl.id));
            let details = self.incompatibility_details(compatibility);
            let diagnostic = self.diagnostic_at(
                &diagnostic_messages::ACTUAL_WITHOUT_EXPECT,
                decl.source,
                &[subject.as_str(), details.as_str()],
            );
            let candidates = compatibility.values().flatten().copied();
            diagnostics.push(self.with_expected(diagnostic, candidates));
        } else {
            self.check_annotation_defaults(decl, compatibility, diagnostics);
        }
    }

    fn report_unfulfilled_members(
        &self,
        decl: &Declaration,
        unfulfilled: &[UnfulfilledMember],
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let remaining: Vec<&UnfulfilledMember> = unfulfilled
            .iter()
            .filter(|member| !self.has_single_actual_suspect(member))
            .collect();
        if remaining.is_empty() {
            return;
        }

        let mut details = String::new();
        for member in &remaining {
            details.push_str("\n\n    ");
            details.push_str(&self.renderer.render(member.expected));
            for (reason, decls) in &member.incompatibilities {
                self.push_reason(&mut details, reason, decls, "    ");
            }
        }
        let diagnostic = self.diagnostic_at(
            &diagnostic_messages::NO_ACTUAL_CLASS_MEMBER_FOR_EXPECTED_CLASS,
            decl.source,
            &[self.store.resolve(decl.fq_name), details.as_str()],
        );
        diagnostics.push(self.with_expected(diagnostic, remaining.iter().map(|m| m.expected)));
    }

    /// The member was rejected by exactly one explicit actual member whose
    /// own lookup lands on the same expected member, so that member already
    /// reports the mismatch.
    fn has_single_actual_suspect(&self, member: &UnfulfilledMember) -> bool {
        if member.incompatibilities.len() != 1 || member.incompatibilities.all_strong() {
            return false;
        }
        let Some((_, suspects)) = member.incompatibilities.first() else {
            return false;
        };
        let [suspect] = suspects.as_slice() else {
            return false;
        };
        if self.store.decl(*suspect).is_synthetic() {
            return false;
        }
        let Some(resolution) = self.resolver.find_expect_for_actual(*suspect) else {
            return false;
        };
        resolution.len() == 1
            && resolution
                .values()
                .next()
                .is_some_and(|expected| expected.as_slice() == [member.expected])
    }

    /// Annotation constructors, primary constructors of inline classes and
    /// the underlying property of an inline class may omit `actual`.
    fn requires_actual_modifier(&self, decl: &Declaration) -> bool {
        let Some(container) = decl.container.map(|id| self.store.decl(id)) else {
            return true;
        };
        match decl.category() {
            DeclarationCategory::Constructor => {
                !(container.is_annotation_class()
                    || (decl.is_primary_constructor() && container.is_inline_class()))
            }
            DeclarationCategory::Property if container.is_inline_class() => {
                !self.is_underlying_property(decl, container)
            }
            _ => true,
        }
    }

    fn is_underlying_property(&self, property: &Declaration, class: &Declaration) -> bool {
        let session = self.store.session(class.module);
        session
            .constructors(class.id)
            .into_iter()
            .map(|ctor| self.store.decl(ctor))
            .find(|ctor| ctor.is_primary_constructor())
            .and_then(|ctor| ctor.as_callable())
            .is_some_and(|ctor| {
                matches!(ctor.value_params.as_slice(), [param] if param.name == property.name)
            })
    }

    /// Constant defaults of the expected annotation's constructor must
    /// agree with the same-named parameters of the actual constructor.
    fn check_annotation_defaults(
        &self,
        decl: &Declaration,
        compatibility: &CompatibilityMap,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let store = self.store;
        // Ambiguous expects are reported separately; the first one decides.
        let Some(&expected) = compatibility
            .get(&Compatibility::Compatible)
            .and_then(|compatible| compatible.first())
        else {
            return;
        };
        let expected_decl = store.decl(expected);
        if !expected_decl.is_annotation_class() {
            return;
        }

        let session = store.session(decl.module);
        let actual_class = match decl.category() {
            DeclarationCategory::Class => Some(decl.id),
            DeclarationCategory::TypeAlias => session.expand_to_class(decl.id),
            _ => None,
        };
        let Some(actual_class) = actual_class else {
            return;
        };
        let actual_class_session = session.session_of(actual_class);
        let Some(&actual_ctor) = actual_class_session.constructors(actual_class).first() else {
            return;
        };
        let expected_ctors = store.session(expected_decl.module).constructors(expected);
        let [expected_ctor] = expected_ctors.as_slice() else {
            return;
        };
        let (Some(ec), Some(ac)) = (
            store.decl(*expected_ctor).as_callable(),
            store.decl(actual_ctor).as_callable(),
        ) else {
            return;
        };

        let actual_ctor_decl = store.decl(actual_ctor);
        let anchor = if actual_ctor_decl.source.is_synthetic() {
            decl.source
        } else {
            actual_ctor_decl.source
        };

        for expected_param in &ec.value_params {
            let name = store.resolve(expected_param.name);
            let Some(actual_param) = ac.value_params.iter().find(|p| p.name == expected_param.name)
            else {
                trace!(parameter = name, "no actual annotation parameter with this name");
                continue;
            };
            let (Some(expected_value), Some(actual_value)) =
                (&expected_param.default_value, &actual_param.default_value)
            else {
                continue;
            };
            if expected_value.is_constant() && actual_value.is_constant() && expected_value != actual_value
            {
                let diagnostic = self.diagnostic_at(
                    &diagnostic_messages::ACTUAL_ANNOTATION_CONFLICTING_DEFAULT_ARGUMENT_VALUE,
                    anchor,
                    &[name],
                );
                diagnostics.push(self.with_expected(diagnostic, [*expected_ctor]));
            }
        }
    }

    // =========================================================================
    // Message helpers
    // =========================================================================

    fn incompatibility_details(&self, compatibility: &CompatibilityMap) -> String {
        let mut out = String::new();
        for (verdict, decls) in compatibility {
            if let Some(reason) = verdict.incompatibility() {
                self.push_reason(&mut out, reason, decls, "");
            }
        }
        out
    }

    fn push_reason(&self, out: &mut String, reason: &Incompatibility, decls: &[DeclId], indent: &str) {
        let subject = if decls.len() == 1 {
            "declaration is"
        } else {
            "declarations are"
        };
        out.push_str(&format!(
            "\n{indent}The following {subject} incompatible because {}:",
            reason.description()
        ));
        for &decl in decls {
            out.push_str(&format!("\n{indent}    {}", self.renderer.render(decl)));
        }
    }

    fn diagnostic_at(
        &self,
        message: &DiagnosticMessage,
        anchor: SourceAnchor,
        args: &[&str],
    ) -> Diagnostic {
        Diagnostic::from_message(
            message,
            self.store.resolve(anchor.file).to_string(),
            anchor.start,
            anchor.length,
            args,
        )
    }

    fn with_expected(
        &self,
        diagnostic: Diagnostic,
        expected: impl IntoIterator<Item = DeclId>,
    ) -> Diagnostic {
        expected.into_iter().fold(diagnostic, |diagnostic, id| {
            let source = self.store.decl(id).source;
            diagnostic.with_related(
                self.store.resolve(source.file).to_string(),
                source.start,
                source.length,
                format!("Expected {} is declared here", self.store.describe(id)),
            )
        })
    }
}

#[cfg(test)]
#[path = "tests/checker_tests.rs"]
mod tests;
