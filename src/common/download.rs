use std::{fs::File, io::Write, path::{Path, PathBuf}, time::Duration};

use anyhow::{bail, Context, Result};
use reqwest::{blocking::Client, redirect::Policy};
use tempfile::NamedTempFile;
use tracing::info;

/// Census county adjacency file (legacy tab-separated layout).
pub const CENSUS_ADJACENCY_URL: &str = "https://www2.census.gov/geo/docs/reference/county_adjacency.txt";

/// Write-then-rename wrapper for atomic file outputs
struct PendingWrite {
    target: PathBuf,
    tmp: Option<NamedTempFile>,
}

impl PendingWrite {
    /// Open a temporary file next to `target`.
    fn open(target: &Path, force: bool) -> Result<Self> {
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        if !force && target.exists() {
            bail!("Refusing to overwrite existing file: {} (use --force)", target.display());
        }
        let dir = target.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let tmp = NamedTempFile::new_in(dir).context("create temp file")?;

        Ok(Self { target: target.to_path_buf(), tmp: Some(tmp) })
    }

    /// Move the finished temp file into place.
    fn finalize(mut self) -> Result<()> {
        let Some(tmp) = self.tmp.take() else { bail!("write already finalized") };
        tmp.as_file().sync_all().ok(); // best-effort fsync file
        tmp.persist(&self.target)
            .with_context(|| format!("rename to {}", self.target.display()))?;
        if let Some(dir) = self.target.parent() {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }

    fn file(&mut self) -> std::io::Result<&mut NamedTempFile> {
        self.tmp.as_mut().ok_or_else(|| std::io::Error::other("write already finalized"))
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.file()?.write(buf) }
    fn flush(&mut self) -> std::io::Result<()> { self.file()?.flush() }
}

fn client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent("countymander/0.1")
        .redirect(Policy::limited(10))
        .timeout(Duration::from_secs(120))
        .build()?)
}

/// Fetch a remote file into memory.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    info!("[common::download] GET {url}");
    let resp = client()?
        .get(url)
        .send()
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url} returned error status"))?;

    Ok(resp.bytes().with_context(|| format!("read body of {url}"))?.to_vec())
}

/// Download `url` to `out_path` atomically; refuses to overwrite unless `force`.
pub fn download_file(url: &str, out_path: &Path, force: bool) -> Result<()> {
    let mut sink = PendingWrite::open(out_path, force)?;

    info!("[common::download] GET {url} -> {}", out_path.display());
    let mut resp = client()?
        .get(url)
        .send()
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url} returned error status"))?;

    std::io::copy(&mut resp, &mut sink).with_context(|| format!("write {}", out_path.display()))?;

    sink.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_write_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("adjacency.txt");
        std::fs::write(&target, "old").unwrap();

        assert!(PendingWrite::open(&target, false).is_err());

        let mut sink = PendingWrite::open(&target, true).unwrap();
        sink.write_all(b"new").unwrap();
        sink.finalize().unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }
}
