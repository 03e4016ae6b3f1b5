//! Compiler System
//!
//! Registry of per-type compilers and the batch compile decision engine:
//! 1. Skip untyped and ignored assets
//! 2. Assets without a compiler are dependency-only; when their timestamp
//!    changes every dependent is force-compiled
//! 3. Everything else is compiled when forced or stale, and a successful
//!    compile force-compiles the asset's dependents
//!
//! Dependency propagation tracks the chain of assets being propagated, so a
//! cyclic dependency is reported as a failure instead of recursing forever.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::CompilerConfig;
use crate::domain::entities::{BuildSettings, DependencyGraph, ShaderDatabase, StringIdRepository};
use crate::domain::ports::{
    BuildEvent, BuildEventSink, CompileError, Compiler, CompilerContext, FileSource,
};
use crate::domain::value_objects::{normalize_path, AssetSource};
use crate::infrastructure::compilers::create_compiler;

/// The metadata stores compilers read and update
#[derive(Debug, Default)]
pub struct BuildStores {
    pub dependencies: DependencyGraph,
    pub shaders: ShaderDatabase,
    pub string_ids: StringIdRepository,
}

/// Outcome counts of one batch, dependents included
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub compiled: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct CompilerSystem {
    compilers: HashMap<String, Box<dyn Compiler>>,
    ignore_list: HashSet<String>,
    source: Arc<dyn FileSource>,
    target: Arc<dyn FileSource>,
    settings: BuildSettings,
    stop: Arc<AtomicBool>,
}

impl CompilerSystem {
    pub fn new(source: Arc<dyn FileSource>, target: Arc<dyn FileSource>) -> Self {
        Self {
            compilers: HashMap::new(),
            ignore_list: HashSet::new(),
            source,
            target,
            settings: BuildSettings::default(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Register a compiler for its source type, replacing any previous one
    pub fn register_compiler(&mut self, compiler: Box<dyn Compiler>) {
        let source_type = compiler.source_type().to_string();
        if self.compilers.insert(source_type.clone(), compiler).is_some() {
            tracing::warn!(source_type = %source_type, "Replacing previously registered compiler");
        }
    }

    pub fn unregister_compiler(&mut self, source_type: &str) -> Option<Box<dyn Compiler>> {
        self.compilers.remove(source_type)
    }

    /// Register one compiler per configuration entry; unknown actions are skipped
    pub fn register_compilers(&mut self, configs: &[CompilerConfig]) {
        for config in configs {
            match create_compiler(config) {
                Some(compiler) => self.register_compiler(compiler),
                None => tracing::warn!(
                    action = %config.action,
                    source_type = %config.source_type,
                    "Unknown compiler action, skipping"
                ),
            }
        }
    }

    pub fn has_compiler(&self, source_type: &str) -> bool {
        self.compilers.contains_key(source_type)
    }

    /// Never compile `path`
    pub fn add_ignore_asset(&mut self, path: &str) {
        self.ignore_list.insert(normalize_path(path));
    }

    pub fn set_build_settings(&mut self, settings: BuildSettings) {
        self.settings = settings;
    }

    pub fn build_settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// Share a stop flag; a batch stops between assets once it is set
    pub fn set_stop_flag(&mut self, stop: Arc<AtomicBool>) {
        self.stop = stop;
    }

    fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Compile a batch of sources in order.
    ///
    /// Per-asset failures are reported through `events` and never stop the
    /// batch.
    pub fn compile(
        &self,
        sources: &[AssetSource],
        force: bool,
        stores: &mut BuildStores,
        events: &dyn BuildEventSink,
    ) -> BatchReport {
        if sources.len() > 1 {
            events.on_event(BuildEvent::CompileBatch {
                sources: sources.iter().map(|s| s.path().to_string()).collect(),
            });
        }

        let mut run = BatchRun {
            stores,
            events,
            chain: Vec::new(),
            report: BatchReport::default(),
        };
        for source in sources {
            if self.is_stopping() {
                tracing::info!("Stop requested, abandoning batch");
                break;
            }
            self.compile_asset(source, force, &mut run);
        }
        run.report
    }

    fn context<'a>(&'a self, stores: &'a mut BuildStores) -> CompilerContext<'a> {
        CompilerContext {
            source: self.source.as_ref(),
            target: self.target.as_ref(),
            dependencies: &mut stores.dependencies,
            shaders: &mut stores.shaders,
            string_ids: &mut stores.string_ids,
            settings: &self.settings,
        }
    }

    fn compile_asset(&self, source: &AssetSource, force: bool, run: &mut BatchRun<'_>) {
        if source.source_type().is_empty() || self.ignore_list.contains(source.path()) {
            return;
        }

        let Some(compiler) = self.compilers.get(source.source_type()) else {
            self.check_dependency_file(source, run);
            return;
        };

        let path = source.path();
        let target = source.target_path(compiler.output_type());
        let needed = force || {
            let context = self.context(run.stores);
            compiler.need_compile(path, &target, &context)
        };
        if !needed {
            run.report.skipped += 1;
            run.events.on_event(BuildEvent::CompileSkip {
                source: path.to_string(),
                target,
            });
            return;
        }

        run.events.on_event(BuildEvent::Compile {
            source: path.to_string(),
            target: target.clone(),
        });
        let result = {
            let mut context = self.context(run.stores);
            compiler.compile(path, &target, &mut context)
        };

        match result {
            Ok(()) => {
                run.report.compiled += 1;
                run.events.on_event(BuildEvent::CompileSuccessful {
                    source: path.to_string(),
                    target,
                });
                self.compile_dependents(path, run);
            }
            Err(error) => self.report_failure(path, target, error, run),
        }
    }

    /// An asset nobody compiles; only its dependents care about it
    fn check_dependency_file(&self, source: &AssetSource, run: &mut BatchRun<'_>) {
        let path = source.path();
        let current = self.source.last_modified(path);
        let recorded = run.stores.dependencies.modified_time(path);

        if current.is_none() || current != recorded {
            self.compile_dependents(path, run);
            if let Some(time) = current {
                run.stores.dependencies.update_modified_time(path, time);
            }
        }

        run.report.skipped += 1;
        run.events.on_event(BuildEvent::CompileSkip {
            source: path.to_string(),
            target: String::new(),
        });
    }

    fn compile_dependents(&self, resource: &str, run: &mut BatchRun<'_>) {
        let dependents = run.stores.dependencies.dependents(resource);
        if dependents.is_empty() {
            return;
        }

        run.chain.push(resource.to_string());
        for dependent in dependents {
            if self.is_stopping() {
                break;
            }
            let source = AssetSource::new(&dependent);
            if run.chain.contains(&dependent) {
                let mut chain = run.chain.clone();
                chain.push(dependent);
                let target = self
                    .compilers
                    .get(source.source_type())
                    .map(|c| source.target_path(c.output_type()))
                    .unwrap_or_default();
                self.report_failure(source.path(), target, CompileError::DependencyCycle { chain }, run);
                continue;
            }
            self.compile_asset(&source, true, run);
        }
        run.chain.pop();
    }

    fn report_failure(&self, source: &str, target: String, error: CompileError, run: &mut BatchRun<'_>) {
        tracing::error!(source = %source, "Failed to compile: {error}");
        run.report.failed += 1;
        run.events.on_event(BuildEvent::CompileFailed {
            source: source.to_string(),
            target,
            error,
        });
    }
}

/// Mutable state threaded through one batch
struct BatchRun<'a> {
    stores: &'a mut BuildStores,
    events: &'a dyn BuildEventSink,
    /// Assets whose dependents are currently being compiled
    chain: Vec<String>,
    report: BatchReport,
}
