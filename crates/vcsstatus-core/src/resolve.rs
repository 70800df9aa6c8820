use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::inspect::{InspectError, InspectOutcome, Inspector};
use crate::palette::Palette;
use crate::types::{RepositoryStatus, VcsPreference};

/// `errors` holds every inspection failure seen on the way, including ones
/// the detect path moved past, so an absent status can still be explained.
#[derive(Debug, Default)]
pub struct Resolution {
    pub status: Option<RepositoryStatus>,
    pub errors: Vec<InspectError>,
}

impl Resolution {
    fn found(status: RepositoryStatus) -> Self {
        Self {
            status: Some(status),
            errors: Vec::new(),
        }
    }
}

/// Picks the inspector for a request. Detection tries git, then Mercurial.
#[derive(Debug)]
pub struct Resolver<G, H> {
    git: G,
    hg: H,
    inspect_timeout: Duration,
}

impl<G, H> Resolver<G, H>
where
    G: Inspector,
    H: Inspector,
{
    pub fn new(git: G, hg: H, inspect_timeout: Duration) -> Self {
        Self {
            git,
            hg,
            inspect_timeout,
        }
    }

    pub async fn resolve(
        &self,
        directory: &Path,
        preference: VcsPreference,
        palette: Palette,
    ) -> Resolution {
        match preference {
            VcsPreference::Git => self.resolve_with(&self.git, directory, palette).await,
            VcsPreference::Mercurial => self.resolve_with(&self.hg, directory, palette).await,
            VcsPreference::Detect => self.detect(directory, palette).await,
        }
    }

    /// Explicit preference: the inspector's answer stands, no fallback.
    async fn resolve_with<I: Inspector>(
        &self,
        inspector: &I,
        directory: &Path,
        palette: Palette,
    ) -> Resolution {
        match self.inspect(inspector, directory, palette).await {
            InspectOutcome::Found(status) => Resolution::found(status),
            InspectOutcome::NotThisVcs => {
                Resolution::found(RepositoryStatus::not_a_repository(inspector.kind()))
            }
            InspectOutcome::Failed(err) => {
                warn!(vcs = %inspector.kind(), error = %err, "inspection failed");
                Resolution {
                    status: None,
                    errors: vec![err],
                }
            }
        }
    }

    async fn detect(&self, directory: &Path, palette: Palette) -> Resolution {
        let mut errors = Vec::new();

        match self.inspect(&self.git, directory, palette).await {
            InspectOutcome::Found(status) => return Resolution::found(status),
            InspectOutcome::NotThisVcs => {}
            InspectOutcome::Failed(err) => {
                warn!(vcs = %self.git.kind(), error = %err, "inspection failed, trying next vcs");
                errors.push(err);
            }
        }

        match self.inspect(&self.hg, directory, palette).await {
            InspectOutcome::Found(status) => {
                return Resolution {
                    status: Some(status),
                    errors,
                }
            }
            InspectOutcome::NotThisVcs => {}
            InspectOutcome::Failed(err) => {
                warn!(vcs = %self.hg.kind(), error = %err, "inspection failed");
                errors.push(err);
            }
        }

        debug!(directory = %directory.display(), "no repository detected");
        Resolution {
            status: None,
            errors,
        }
    }

    async fn inspect<I: Inspector>(
        &self,
        inspector: &I,
        directory: &Path,
        palette: Palette,
    ) -> InspectOutcome {
        match tokio::time::timeout(self.inspect_timeout, inspector.inspect(directory, palette))
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => InspectOutcome::Failed(InspectError::Timeout {
                vcs: inspector.kind(),
                timeout: self.inspect_timeout,
            }),
        }
    }
}
