use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::config::ResolvedConfig;
use crate::inspect::{GitInspector, Inspector, MercurialInspector};
use crate::palette::Palette;
use crate::render::render;
use crate::resolve::Resolver;
use crate::types::{Request, Response};

/// Resolve-and-render, shared by daemon connections and single-use runs.
#[derive(Debug)]
pub struct StatusService<G, H> {
    resolver: Resolver<G, H>,
    request_timeout: Duration,
}

pub type DefaultStatusService = StatusService<GitInspector, MercurialInspector>;

impl DefaultStatusService {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(
            Resolver::new(
                GitInspector::new(config.git_binary.clone()),
                MercurialInspector::new(config.hg_binary.clone()),
                Duration::from_secs(config.inspect_timeout_secs),
            ),
            Duration::from_secs(config.request_timeout_secs),
        )
    }
}

impl<G, H> StatusService<G, H>
where
    G: Inspector,
    H: Inspector,
{
    pub fn new(resolver: Resolver<G, H>, request_timeout: Duration) -> Self {
        Self {
            resolver,
            request_timeout,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub async fn respond(&self, request: &Request) -> Response {
        if request.directory.is_empty() {
            return render(request, None);
        }

        let palette = Palette::new(request.force_color);
        let resolution = self
            .resolver
            .resolve(Path::new(&request.directory), request.vcs_preference, palette)
            .await;
        if resolution.status.is_none() {
            debug!(
                directory = %request.directory,
                errors = resolution.errors.len(),
                "no repository status"
            );
        }

        render(request, resolution.status.as_ref())
    }
}
