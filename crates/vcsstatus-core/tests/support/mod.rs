#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use vcsstatus_core::inspect::{InspectError, InspectOutcome, Inspector};
use vcsstatus_core::palette::{Accent, Palette};
use vcsstatus_core::resolve::Resolver;
use vcsstatus_core::service::StatusService;
use vcsstatus_core::types::{AnsiString, RepositoryStatus, VcsKind};

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Found,
    NotThisVcs,
    Fail,
    /// Panics when called; proves a code path never reaches the inspector.
    Forbidden,
}

/// Inspector double that counts calls and can be slowed down.
#[derive(Debug, Clone)]
pub struct StubInspector {
    kind: VcsKind,
    behavior: Behavior,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl StubInspector {
    pub fn new(kind: VcsKind, behavior: Behavior) -> Self {
        Self {
            kind,
            behavior,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Inspector for StubInspector {
    fn kind(&self) -> VcsKind {
        self.kind
    }

    async fn inspect(&self, directory: &Path, palette: Palette) -> InspectOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Behavior::Forbidden = self.behavior {
            panic!("{} inspector must not be called", self.kind);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.behavior {
            Behavior::Found => InspectOutcome::Found(sample_status(self.kind, directory, palette)),
            Behavior::NotThisVcs => InspectOutcome::NotThisVcs,
            Behavior::Fail | Behavior::Forbidden => {
                InspectOutcome::Failed(InspectError::CommandFailed {
                    cmd: format!("{} status", self.kind),
                    code: Some(1),
                    stderr: "boom".to_string(),
                })
            }
        }
    }
}

/// A status whose branch is the directory's last component, so responses
/// can be matched back to the request that produced them.
pub fn sample_status(kind: VcsKind, directory: &Path, palette: Palette) -> RepositoryStatus {
    let branch = directory
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut counts = BTreeMap::new();
    counts.insert('M', 1);

    RepositoryStatus {
        is_repo: true,
        vcs: AnsiString {
            plain: kind.label().to_string(),
            colored: palette.paint(Accent::BrightCyan, kind.label()),
        },
        vcs_color: Accent::BrightCyan,
        repo_name: "sample".to_string(),
        repo_path: directory.display().to_string(),
        current_branch: AnsiString {
            colored: palette.paint(Accent::Green, &branch),
            plain: branch,
        },
        tracking: AnsiString::default(),
        branches: Vec::new(),
        status_counts: counts,
        status: AnsiString::uncolored("M:1"),
    }
}

pub fn service(
    git: StubInspector,
    hg: StubInspector,
) -> StatusService<StubInspector, StubInspector> {
    StatusService::new(
        Resolver::new(git, hg, Duration::from_secs(5)),
        Duration::from_secs(5),
    )
}

/// Counts WARN and ERROR events on the current thread while the guard lives.
pub fn capture_warnings() -> (DefaultGuard, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&count)));
    (tracing::subscriber::set_default(subscriber), count)
}

struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() <= Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}
