use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::Credentials;
use crate::exec::{resolve_executable, run_captured};

/// Header token of `infra list` tabular output.
const LIST_HEADER: &str = "NAME";

/// Cluster listing and activation, decoupled from the subprocess-and-parse
/// strategy behind it.
pub trait ClusterProvider {
    async fn clusters(&self) -> Result<Vec<String>>;
    async fn activate(&self, cluster: &str) -> Result<()>;
}

/// The Infra broker CLI, driven as an external program.
pub struct InfraCli {
    path: PathBuf,
    endpoint: String,
}

impl InfraCli {
    pub fn locate(endpoint: String) -> Result<Self> {
        let path = resolve_executable("infra")?;
        debug!("using broker at {}", path.display());
        Ok(Self { path, endpoint })
    }

    /// Authenticate against the broker. The password travels over the child's
    /// stdin as a single line; success is judged by exit status alone, no
    /// output is parsed.
    pub async fn login(&self, creds: &Credentials) -> Result<()> {
        let mut child = Command::new(&self.path)
            .args(["login", &self.endpoint, "--user", &creds.username])
            .stdin(Stdio::piped())
            .spawn()
            .context("failed to start infra login")?;

        let mut stdin = child
            .stdin
            .take()
            .context("failed to open stdin for infra login")?;
        stdin
            .write_all(format!("{}\n", creds.password).as_bytes())
            .await
            .context("failed to write password to infra login")?;
        drop(stdin);

        let status = child
            .wait()
            .await
            .context("failed to wait for infra login")?;
        if !status.success() {
            bail!("infra login failed ({status})");
        }
        Ok(())
    }
}

impl ClusterProvider for InfraCli {
    async fn clusters(&self) -> Result<Vec<String>> {
        let out = run_captured(&self.path, &["list"]).await?;
        Ok(parse_cluster_names(&out))
    }

    async fn activate(&self, cluster: &str) -> Result<()> {
        run_captured(&self.path, &["use", cluster]).await?;
        info!("switched context to {cluster}");
        Ok(())
    }
}

/// First whitespace-delimited token of every non-blank, non-header line,
/// in input order.
pub fn parse_cluster_names(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|first| *first != LIST_HEADER)
        .map(str::to_string)
        .collect()
}
