use anyhow::{Context, Result, bail};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncWrite;
use tokio::process::Command;
use tracing::debug;

use crate::exec::{resolve_executable, run_captured};

/// Header token of `kubectl get pods` tabular output.
const PODS_HEADER: &str = "NAME";
const APP_LABEL_PREFIX: &str = "app=";
/// Lookback window for `kubectl logs`.
const LOG_SINCE: &str = "--since=1h";

/// App-label discovery, decoupled from the subprocess-and-parse strategy
/// behind it.
pub trait PodLabelProvider {
    async fn app_labels(&self) -> Result<Vec<String>>;
}

pub struct KubectlCli {
    path: PathBuf,
}

impl KubectlCli {
    pub fn locate() -> Result<Self> {
        let path = resolve_executable("kubectl")?;
        debug!("using kubectl at {}", path.display());
        Ok(Self { path })
    }

    /// Follow logs for every pod carrying `label` until the child exits or
    /// is interrupted. Child output is relayed verbatim to our own streams;
    /// there is no restart or reconnection.
    pub async fn follow_logs(&self, label: &str) -> Result<()> {
        let mut cmd = Command::new(&self.path);
        cmd.args(["logs", "-f", "-l", label, LOG_SINCE, "--prefix"]);

        let status =
            stream_child(cmd, &mut tokio::io::stdout(), &mut tokio::io::stderr()).await?;
        if !status.success() {
            bail!("kubectl logs exited with {status}");
        }
        Ok(())
    }
}

impl PodLabelProvider for KubectlCli {
    async fn app_labels(&self) -> Result<Vec<String>> {
        let out = run_captured(&self.path, &["get", "pods", "--show-labels"]).await?;
        Ok(parse_app_labels(&out).into_iter().collect())
    }
}

/// `app=` entries of the trailing label column, deduplicated and sorted.
pub fn parse_app_labels(listing: &str) -> BTreeSet<String> {
    let mut labels = BTreeSet::new();
    for line in listing.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 || fields[0] == PODS_HEADER {
            continue;
        }
        let label_col = fields[fields.len() - 1];
        for entry in label_col.split(',') {
            let entry = entry.trim();
            if entry.starts_with(APP_LABEL_PREFIX) {
                labels.insert(entry.to_string());
            }
        }
    }
    labels
}

/// Spawn `cmd` with piped output and relay both streams to the given sinks
/// while waiting for it to exit. The two relays are independent of each other
/// and each runs to end of stream, so every byte the child wrote has been
/// forwarded by the time this returns.
pub async fn stream_child(
    mut cmd: Command,
    out: &mut (impl AsyncWrite + Unpin),
    err: &mut (impl AsyncWrite + Unpin),
) -> Result<ExitStatus> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    let program = cmd.as_std().get_program().to_string_lossy().into_owned();
    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;
    let mut child_out = child.stdout.take().context("child stdout not piped")?;
    let mut child_err = child.stderr.take().context("child stderr not piped")?;

    let (status, out_copied, err_copied) = tokio::join!(
        child.wait(),
        tokio::io::copy(&mut child_out, out),
        tokio::io::copy(&mut child_err, err),
    );
    out_copied.context("relaying child stdout")?;
    err_copied.context("relaying child stderr")?;
    status.with_context(|| format!("failed to wait for {program}"))
}
