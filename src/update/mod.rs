// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Background check for a newer release.
//!
//! ```text
//! Configuring                                  Validating
//!   UpdateProbe::spawn(source) --tokio task--> probe.join(5s)
//!        |                                         |
//!        v                                         v
//!   ReleaseSource::latest_release()           ProbeOutcome
//!     GitHubReleases (reqwest)                  UpdateAvailable
//!       GET {base}/repos/{owner}/{repo}/        UpToDate
//!           releases/latest                     Unavailable
//!                                               TimedOut
//! ```
//!
//! Network problems never fail the run; they surface as
//! [`ReleaseLookup::Failed`] and then [`ProbeOutcome::Unavailable`].


use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use reqwest::{Client, ClientBuilder, StatusCode, header};
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{NetworkError, RmmResult};

/// Owner of the upstream repository.
pub const RELEASE_OWNER: &str = "SutandoTsukai181";

/// Upstream repository name.
pub const RELEASE_REPO: &str = "RyuModManager";

/// Releases whose name lacks this are not mod manager releases.
const RELEASE_NAME_MARKER: &str = "Ryu Mod Manager";

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Version tag of this build, e.g. `v3.2.2`.
#[must_use]
pub fn current_version_tag() -> String {
    format!("v{}", env!("CARGO_PKG_VERSION"))
}

/// A published release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub tag: String,
    pub name: String,
    pub url: String,
}

/// Result of asking a [`ReleaseSource`] for the latest release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseLookup {
    Found(Release),
    /// The repository has no published release.
    NoRelease,
    /// The lookup failed; the reason is for logs only.
    Failed(String),
}

/// Somewhere releases can be looked up.
///
/// Returns a boxed future so the trait stays object safe.
pub trait ReleaseSource: Send + Sync {
    fn latest_release<'a>(&'a self, owner: &'a str, repo: &'a str)
    -> BoxFuture<'a, ReleaseLookup>;
}

#[derive(Debug, Deserialize)]
struct ReleasePayload {
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    html_url: String,
}

impl From<ReleasePayload> for Release {
    fn from(payload: ReleasePayload) -> Self {
        Self {
            tag: payload.tag_name,
            name: payload.name.unwrap_or_default(),
            url: payload.html_url,
        }
    }
}

/// GitHub REST releases endpoint.
#[derive(Debug, Clone)]
pub struct GitHubReleases {
    /// A client that failed to build is reported on every lookup.
    client: std::result::Result<Client, String>,
    api_base: String,
}

impl Default for GitHubReleases {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubReleases {
    #[must_use]
    pub fn new() -> Self {
        Self::from_builder(
            Client::builder()
                .user_agent(format!("{RELEASE_REPO}/{}", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(30)),
        )
    }

    pub(crate) fn from_builder(builder: ClientBuilder) -> Self {
        let client = builder.build().map_err(|e| {
            debug!(error = %e, "cannot build http client");
            e.to_string()
        });
        Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Points the client at another API root (used against mock servers).
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn latest_url(&self, owner: &str, repo: &str) -> String {
        format!(
            "{}/repos/{owner}/{repo}/releases/latest",
            self.api_base.trim_end_matches('/')
        )
    }

    async fn fetch_latest(&self, owner: &str, repo: &str) -> RmmResult<Option<Release>> {
        let url = self.latest_url(owner, repo);
        debug!(%url, "fetching latest release");

        let client = self
            .client
            .as_ref()
            .map_err(|e| NetworkError::ClientBuild(e.clone()))?;
        let response = client
            .get(&url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(NetworkError::from)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                url,
            }
            .into());
        }

        let payload: ReleasePayload = response.json().await.map_err(NetworkError::from)?;
        Ok(Some(payload.into()))
    }
}

impl ReleaseSource for GitHubReleases {
    fn latest_release<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
    ) -> BoxFuture<'a, ReleaseLookup> {
        async move {
            match self.fetch_latest(owner, repo).await {
                Ok(Some(release)) => ReleaseLookup::Found(release),
                Ok(None) => ReleaseLookup::NoRelease,
                Err(e) => ReleaseLookup::Failed(e.to_string()),
            }
        }
        .boxed()
    }
}

/// What the update check concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    UpdateAvailable { current: String, latest: Release },
    UpToDate,
    Unavailable { reason: String },
    /// The check did not finish within the wait.
    TimedOut,
}

impl ProbeOutcome {
    /// Compares a lookup result against `current_tag`.
    #[must_use]
    pub fn evaluate(lookup: ReleaseLookup, current_tag: &str) -> Self {
        match lookup {
            ReleaseLookup::Found(release)
                if release.name.contains(RELEASE_NAME_MARKER) && release.tag != current_tag =>
            {
                Self::UpdateAvailable {
                    current: current_tag.to_string(),
                    latest: release,
                }
            }
            ReleaseLookup::Found(_) | ReleaseLookup::NoRelease => Self::UpToDate,
            ReleaseLookup::Failed(reason) => Self::Unavailable { reason },
        }
    }

    /// Lines shown to the user for this outcome.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::UpdateAvailable { current, latest } => vec![
                "New version detected!".to_string(),
                format!("Current version: {current}"),
                format!("Latest version: {}", latest.tag),
                format!("Please update by going to {}", latest.url),
            ],
            Self::UpToDate => vec!["Current version is up to date".to_string()],
            Self::Unavailable { .. } | Self::TimedOut => {
                vec!["Unable to check for updates".to_string()]
            }
        }
    }
}

/// A release lookup running in the background.
#[derive(Debug)]
pub struct UpdateProbe {
    handle: JoinHandle<ReleaseLookup>,
    current_tag: String,
}

impl UpdateProbe {
    /// Starts looking up the upstream repository's latest release.
    pub fn spawn(source: Arc<dyn ReleaseSource>) -> Self {
        Self::spawn_for(source, RELEASE_OWNER, RELEASE_REPO, current_version_tag())
    }

    /// Starts a lookup for an explicit repository and version tag.
    pub fn spawn_for(
        source: Arc<dyn ReleaseSource>,
        owner: &'static str,
        repo: &'static str,
        current_tag: impl Into<String>,
    ) -> Self {
        let handle = tokio::spawn(async move { source.latest_release(owner, repo).await });
        Self {
            handle,
            current_tag: current_tag.into(),
        }
    }

    /// Waits up to `limit` for the lookup.
    ///
    /// On timeout the task is left running in the background and dropped.
    pub async fn join(self, limit: Duration) -> ProbeOutcome {
        match tokio::time::timeout(limit, self.handle).await {
            Ok(Ok(lookup)) => ProbeOutcome::evaluate(lookup, &self.current_tag),
            Ok(Err(e)) => {
                warn!(error = %e, "update check task failed");
                ProbeOutcome::Unavailable {
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                debug!(?limit, "update check timed out");
                ProbeOutcome::TimedOut
            }
        }
    }

    /// Stops waiting for the lookup. The task is detached, not cancelled.
    pub fn abandon(self) {
        debug!("update check abandoned");
        drop(self.handle);
    }
}
