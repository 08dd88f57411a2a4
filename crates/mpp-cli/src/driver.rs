use anyhow::{Context, Result};
use mpp_checker::{CheckerOptions, ExpectActualChecker, SharedResolutionCache};
use mpp_common::{Diagnostic, DiagnosticCategory};
use mpp_model::{DeclId, DeclarationStore};
use mpp_solver::ThreadSafeCache;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info_span};

use crate::args::CliArgs;
use crate::config::resolve_checker_options;
use crate::fixture::load_project;

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub diagnostics: Vec<Diagnostic>,
    pub has_errors: bool,
}

pub fn run(args: &CliArgs) -> Result<RunOutcome> {
    let _span = info_span!("mpp_check", project = %args.project.display()).entered();
    let project = load_project(&args.project)?;
    let options = resolve_checker_options(&project.options, args);
    debug!(
        declarations = project.store.len(),
        modules = project.store.modules().len(),
        jobs = args.jobs,
        "project loaded"
    );

    let diagnostics = if args.jobs > 1 {
        check_parallel(&project.store, options, usize::from(args.jobs))?
    } else {
        ExpectActualChecker::new(&project.store, options).check_all()
    };

    let has_errors = diagnostics
        .iter()
        .any(|diag| diag.category == DiagnosticCategory::Error);
    debug!(count = diagnostics.len(), has_errors, "check finished");
    Ok(RunOutcome {
        diagnostics,
        has_errors,
    })
}

/// Each worker owns a checker; all of them share one resolution cache.
fn check_parallel(
    store: &DeclarationStore,
    options: CheckerOptions,
    jobs: usize,
) -> Result<Vec<Diagnostic>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("failed to start worker threads")?;

    let actuals: Vec<DeclId> = store
        .decls()
        .filter(|decl| decl.is_actual())
        .map(|decl| decl.id)
        .collect();
    let cache: SharedResolutionCache = Arc::new(ThreadSafeCache::new());

    let mut diagnostics: Vec<Diagnostic> = pool.install(|| {
        actuals
            .par_iter()
            .map_init(
                || ExpectActualChecker::with_shared_cache(store, options.clone(), Arc::clone(&cache)),
                |checker, &id| checker.check_declaration(id),
            )
            .flatten()
            .collect()
    });
    diagnostics.sort_by(|left, right| {
        left.file
            .cmp(&right.file)
            .then(left.start.cmp(&right.start))
            .then(left.code.cmp(&right.code))
    });
    Ok(diagnostics)
}
