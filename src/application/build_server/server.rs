use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::application::compiler_system::{BatchReport, BuildStores, CompilerSystem};
use crate::config::{self, BuilderConfig};
use crate::domain::entities::SettingProfiles;
use crate::domain::ports::{BuildEvent, BuildEventSink, FileSource, StoreError, StoreRepository};
use crate::domain::value_objects::{trim_extension, AssetSource, ChangeEvent};
use crate::error::{MasonError, MasonResult};
use crate::infrastructure::{
    is_metadata_path, ConsoleCommand, ConsoleServer, DirectoryWatcher, JsonDependencyRepository,
    JsonShaderRepository, JsonStringIdRepository, LocalFileSource, LogEventSink, ReplyLevel,
    METADATA_DIR,
};

use super::action::{BuildServerHandle, BuildState, PendingAction};
use super::changes::ChangeFilter;

/// Pause after a burst of file changes before compiling
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Sleep between loop iterations
const LOOP_INTERVAL: Duration = Duration::from_millis(1);

/// Startup parameters
#[derive(Debug, Clone)]
pub struct BuilderParams {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    /// Watch the source tree and keep running
    pub server: bool,
    /// Make the initial rebuild a full rebuild
    pub force_recompile: bool,
}

impl Default for BuilderParams {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("Content"),
            target_path: PathBuf::from("Binaries/Content"),
            server: false,
            force_recompile: false,
        }
    }
}

/// The build orchestrator.
///
/// Owns every store and the compiler system. All of them are touched only
/// from the thread calling [`BuildServer::run`]; other threads talk to it
/// through a [`BuildServerHandle`].
pub struct BuildServer {
    source: Arc<dyn FileSource>,
    compiler_system: CompilerSystem,
    stores: BuildStores,
    dependency_repository: JsonDependencyRepository,
    shader_repository: JsonShaderRepository,
    string_id_repository: JsonStringIdRepository,
    profiles: SettingProfiles,
    server: bool,
    force_recompile: bool,
    actions: Receiver<PendingAction>,
    handle: BuildServerHandle,
    changes: Option<Receiver<ChangeEvent>>,
    change_filter: ChangeFilter,
    watcher: Option<DirectoryWatcher>,
    console: Option<ConsoleServer>,
    events: Arc<dyn BuildEventSink>,
    settle_delay: Duration,
}

impl BuildServer {
    /// Open the source tree on disk: read `builder.settings`, create the
    /// metadata and target directories and, in server mode, start the
    /// watcher and the console.
    pub fn open(params: &BuilderParams) -> MasonResult<Self> {
        if !params.source_path.is_dir() {
            return Err(MasonError::DirectoryNotFound {
                path: params.source_path.clone(),
            });
        }

        let source: Arc<dyn FileSource> = Arc::new(LocalFileSource::new(&params.source_path));
        let config = config::load(source.as_ref())?;
        source.make_directory(METADATA_DIR)?;
        std::fs::create_dir_all(&params.target_path)?;
        let target: Arc<dyn FileSource> = Arc::new(LocalFileSource::new(&params.target_path));

        let console_port = config.console_server_port;
        let mut server = Self::with_parts(source, target, config)
            .with_server_mode(params.server)
            .with_force_recompile(params.force_recompile);

        if params.server {
            let (watcher, changes) = DirectoryWatcher::start(&params.source_path)?;
            server.watcher = Some(watcher);
            server.changes = Some(changes);
            if let Some(port) = console_port {
                server.console = Some(ConsoleServer::bind(port)?);
            }
        }
        Ok(server)
    }

    /// Assemble a one-shot server from already opened file sources
    pub fn with_parts(
        source: Arc<dyn FileSource>,
        target: Arc<dyn FileSource>,
        config: BuilderConfig,
    ) -> Self {
        let (sender, actions) = channel();
        let handle = BuildServerHandle::new(sender);

        let mut compiler_system = CompilerSystem::new(source.clone(), target);
        compiler_system.register_compilers(&config.compilers);
        for path in &config.ignore_list {
            compiler_system.add_ignore_asset(path);
        }
        compiler_system.set_build_settings(config.setting_profiles.active().clone());
        compiler_system.set_stop_flag(handle.stop_flag());

        Self {
            dependency_repository: JsonDependencyRepository::new(source.clone()),
            shader_repository: JsonShaderRepository::new(source.clone()),
            string_id_repository: JsonStringIdRepository::new(source.clone()),
            source,
            compiler_system,
            stores: BuildStores::default(),
            profiles: config.setting_profiles,
            server: false,
            force_recompile: false,
            actions,
            handle,
            changes: None,
            change_filter: ChangeFilter::new(),
            watcher: None,
            console: None,
            events: Arc::new(LogEventSink),
            settle_delay: SETTLE_DELAY,
        }
    }

    pub fn with_server_mode(mut self, server: bool) -> Self {
        self.server = server;
        self
    }

    pub fn with_force_recompile(mut self, force: bool) -> Self {
        self.force_recompile = force;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_event_sink(mut self, events: Arc<dyn BuildEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Feed change events from somewhere other than the directory watcher
    pub fn with_change_receiver(mut self, changes: Receiver<ChangeEvent>) -> Self {
        self.changes = Some(changes);
        self
    }

    pub fn with_console(mut self, console: ConsoleServer) -> Self {
        self.console = Some(console);
        self
    }

    pub fn handle(&self) -> BuildServerHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> BuildState {
        self.handle.state()
    }

    pub fn stores(&self) -> &BuildStores {
        &self.stores
    }

    /// Root of the watched source tree, in server mode
    pub fn watched_root(&self) -> Option<&Path> {
        self.watcher.as_ref().map(DirectoryWatcher::root)
    }

    pub fn console_addr(&self) -> Option<SocketAddr> {
        self.console.as_ref().and_then(ConsoleServer::local_addr)
    }

    /// Names of every profile, in declaration order
    pub fn setting_profiles(&self) -> Vec<&str> {
        self.profiles.names().collect()
    }

    pub fn active_profile(&self) -> &str {
        self.profiles.active_name()
    }

    /// Activate a profile without rebuilding; `false` if it does not exist
    pub fn select_profile(&mut self, name: &str) -> bool {
        if !self.profiles.set_active(name) {
            tracing::warn!(
                profile = %name,
                available = %self.setting_profiles().join(", "),
                "Unknown setting profile"
            );
            return false;
        }
        self.compiler_system
            .set_build_settings(self.profiles.active().clone());
        tracing::info!(profile = %name, "Setting profile activated");
        true
    }

    /// Run the initial rebuild, then in server mode keep ticking until
    /// stopped. The stores are saved on the way out.
    pub fn run(&mut self) -> MasonResult<()> {
        let loaded = self.load_stores();
        if !loaded || self.force_recompile {
            self.full_rebuild()?;
        } else {
            self.partial_rebuild()?;
        }

        if self.server {
            tracing::info!("Waiting for changes");
            while !self.handle.is_stopping() {
                self.tick();
                thread::sleep(LOOP_INTERVAL);
            }
        }

        self.handle.set_state(BuildState::Stopping);
        self.save_stores()
    }

    /// One loop iteration: changed files, dirty shaders, at most one
    /// queued action, then the console.
    pub fn tick(&mut self) {
        let changed = match &self.changes {
            Some(changes) => self.change_filter.collect(changes),
            None => Vec::new(),
        };
        if !changed.is_empty() {
            thread::sleep(self.settle_delay);
            self.compile_batch(&changed, false);
        }

        self.compile_dirty_shaders();

        if let Ok(action) = self.actions.try_recv() {
            self.handle_action(action);
        }

        self.service_console();
    }

    /// Forget every dependency and shader, then compile everything
    pub fn full_rebuild(&mut self) -> MasonResult<BatchReport> {
        let started = Instant::now();
        tracing::info!(profile = %self.profiles.active_name(), "Full rebuild started");

        self.stores.dependencies.clear();
        self.stores.shaders.clear();
        let sources = self.scan()?;
        let mut report = self.compile_batch(&sources, true);
        report = add_reports(report, self.compile_dirty_shaders());
        self.save_stores()?;

        log_report("Full rebuild", &report, started);
        Ok(report)
    }

    /// Compile whatever is stale
    pub fn partial_rebuild(&mut self) -> MasonResult<BatchReport> {
        let started = Instant::now();
        tracing::info!(profile = %self.profiles.active_name(), "Scan started");

        let sources = self.scan()?;
        let mut report = self.compile_batch(&sources, false);
        report = add_reports(report, self.compile_dirty_shaders());

        log_report("Scan", &report, started);
        Ok(report)
    }

    /// Load the persisted stores.
    ///
    /// Returns `false` if the dependency or shader store could not be
    /// loaded, in which case the next rebuild must be a full one.
    pub fn load_stores(&mut self) -> bool {
        let mut complete = true;

        match self.dependency_repository.load() {
            Ok(graph) => self.stores.dependencies = graph,
            Err(e) => {
                report_load_failure("dependency database", &e);
                complete = false;
            }
        }
        match self.shader_repository.load() {
            Ok(shaders) => self.stores.shaders = shaders,
            Err(e) => {
                report_load_failure("shader database", &e);
                complete = false;
            }
        }
        match self.string_id_repository.load() {
            Ok(string_ids) => self.stores.string_ids = string_ids,
            Err(e) => report_load_failure("string id repository", &e),
        }

        complete
    }

    pub fn save_stores(&self) -> MasonResult<()> {
        self.dependency_repository.save(&self.stores.dependencies)?;
        self.shader_repository.save(&self.stores.shaders)?;
        self.string_id_repository.save(&self.stores.string_ids)?;
        tracing::debug!("Build metadata saved");
        Ok(())
    }

    fn scan(&self) -> MasonResult<Vec<AssetSource>> {
        self.handle.set_state(BuildState::Scanning);
        let files = self.source.find_files_recursive("", "*")?;
        Ok(files
            .iter()
            .filter(|path| !is_metadata_path(path))
            .map(AssetSource::new)
            .collect())
    }

    fn compile_batch(&mut self, sources: &[AssetSource], force: bool) -> BatchReport {
        self.handle.set_state(BuildState::Compiling);
        let report =
            self.compiler_system
                .compile(sources, force, &mut self.stores, self.events.as_ref());
        self.handle.set_state(BuildState::Idle);
        report
    }

    /// Force-compile shaders that gained permutations until none are dirty.
    ///
    /// The shader compiler clears the flag of a shader it compiles, and a
    /// dependent material compiled in the same batch may set it again. Only
    /// shaders that did not compile are marked clean here, so a broken
    /// shader is not retried on every tick.
    fn compile_dirty_shaders(&mut self) -> BatchReport {
        let mut report = BatchReport::default();
        while self.stores.shaders.is_dirty() {
            let dirty = self.stores.shaders.dirty_shaders();
            let outcome = BatchOutcome::new(self.events.as_ref());

            self.handle.set_state(BuildState::Compiling);
            let batch = self.compiler_system.compile(&dirty, true, &mut self.stores, &outcome);
            self.handle.set_state(BuildState::Idle);
            report = add_reports(report, batch);

            let compiled = outcome.into_compiled();
            for source in dirty.iter().filter(|s| !compiled.contains(s.path())) {
                tracing::warn!(shader = %source.path(), "Shader did not compile, marking it clean");
                if let Some(shader) = self.stores.shaders.shader_mut(trim_extension(source.path())) {
                    shader.set_dirty(false);
                }
            }
        }
        report
    }

    fn handle_action(&mut self, action: PendingAction) {
        tracing::debug!(?action, "Handling queued action");
        let result = match action {
            PendingAction::Scan => self.partial_rebuild(),
            PendingAction::FullRebuild => self.full_rebuild(),
            PendingAction::ChangeProfile(name) => {
                if !self.select_profile(&name) {
                    return;
                }
                self.full_rebuild()
            }
        };
        if let Err(e) = result {
            tracing::error!("Rebuild failed: {e}");
        }
    }

    fn service_console(&mut self) {
        let Some(console) = self.console.as_mut() else {
            return;
        };

        for command in console.poll() {
            match command {
                ConsoleCommand::FullRebuild => {
                    self.handle.queue_full_rebuild();
                    console.reply(ReplyLevel::Info, "Full rebuild queued");
                }
                ConsoleCommand::Scan => {
                    self.handle.queue_scan();
                    console.reply(ReplyLevel::Info, "Scan queued");
                }
                ConsoleCommand::Profile(name) => {
                    if self.profiles.get(&name).is_some() {
                        self.handle.set_active_profile(&name);
                        console.reply(ReplyLevel::Info, &format!("Switching to profile '{name}'"));
                    } else {
                        console.reply(ReplyLevel::Error, &format!("Unknown profile '{name}'"));
                    }
                }
                ConsoleCommand::StringIdLookup(id) => {
                    match self.stores.string_ids.lookup_hex(&id) {
                        Some(value) => console.reply(ReplyLevel::Info, &format!("{id}: {value}")),
                        None => console.reply(
                            ReplyLevel::Warning,
                            &format!("String id {id} not found"),
                        ),
                    }
                }
            }
        }
    }
}

/// Forwards events and remembers which sources compiled
struct BatchOutcome<'a> {
    inner: &'a dyn BuildEventSink,
    compiled: Mutex<HashSet<String>>,
}

impl<'a> BatchOutcome<'a> {
    fn new(inner: &'a dyn BuildEventSink) -> Self {
        Self {
            inner,
            compiled: Mutex::new(HashSet::new()),
        }
    }

    fn into_compiled(self) -> HashSet<String> {
        self.compiled.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl BuildEventSink for BatchOutcome<'_> {
    fn on_event(&self, event: BuildEvent) {
        if let BuildEvent::CompileSuccessful { source, .. } = &event {
            self.compiled
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(source.clone());
        }
        self.inner.on_event(event);
    }
}

fn report_load_failure(store: &str, error: &StoreError) {
    match error {
        StoreError::NotFound => tracing::info!("No {store} found"),
        other => tracing::warn!("Failed to load {store}: {other}"),
    }
}

fn add_reports(a: BatchReport, b: BatchReport) -> BatchReport {
    BatchReport {
        compiled: a.compiled + b.compiled,
        skipped: a.skipped + b.skipped,
        failed: a.failed + b.failed,
    }
}

fn log_report(what: &str, report: &BatchReport, started: Instant) {
    let elapsed_ms = started.elapsed().as_millis();
    if report.failed > 0 {
        tracing::warn!(
            compiled = report.compiled,
            skipped = report.skipped,
            failed = report.failed,
            elapsed_ms,
            "{what} finished with failures"
        );
    } else {
        tracing::info!(
            compiled = report.compiled,
            skipped = report.skipped,
            elapsed_ms,
            "{what} finished"
        );
    }
}
