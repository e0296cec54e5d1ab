//! Blocking reads from `file://` and `http(s)://` repositories

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Outcome of a single download attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fetched {
    /// Stored at the requested destination
    Stored,
    /// The repository does not have this file
    Missing,
}

pub(crate) struct Transport {
    agent: ureq::Agent,
    user_agent: String,
}

impl Transport {
    pub(crate) fn new(timeout: Duration, user_agent: String) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
            user_agent,
        }
    }

    /// Download `url` into `dest`, replacing any previous copy
    pub(crate) fn download(&self, url: &Url, dest: &Path) -> Result<Fetched, String> {
        match url.scheme() {
            "file" => {
                let source = local_path(url)?;
                match File::open(&source) {
                    Ok(mut file) => store(&mut file, dest).map(|()| Fetched::Stored),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Fetched::Missing),
                    Err(e) => Err(format!("reading {}: {}", source.display(), e)),
                }
            }
            "http" | "https" => match self.get(url)? {
                Some(response) => {
                    let mut reader = response.into_body().into_reader();
                    store(&mut reader, dest).map(|()| Fetched::Stored)
                }
                None => Ok(Fetched::Missing),
            },
            other => Err(format!("unsupported scheme: {}", other)),
        }
    }

    /// Read a small text document; `None` when the repository lacks it
    pub(crate) fn read_text(&self, url: &Url) -> Result<Option<String>, String> {
        match url.scheme() {
            "file" => {
                let source = local_path(url)?;
                match fs::read_to_string(&source) {
                    Ok(text) => Ok(Some(text)),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(format!("reading {}: {}", source.display(), e)),
                }
            }
            "http" | "https" => match self.get(url)? {
                Some(mut response) => response
                    .body_mut()
                    .read_to_string()
                    .map(Some)
                    .map_err(|e| format!("reading {}: {}", url, e)),
                None => Ok(None),
            },
            other => Err(format!("unsupported scheme: {}", other)),
        }
    }

    fn get(&self, url: &Url) -> Result<Option<ureq::http::Response<ureq::Body>>, String> {
        debug!("GET {}", url);
        match self
            .agent
            .get(url.as_str())
            .header("User-Agent", self.user_agent.as_str())
            .call()
        {
            Ok(response) => Ok(Some(response)),
            Err(ureq::Error::StatusCode(404)) => Ok(None),
            Err(ureq::Error::StatusCode(code)) => Err(format!("HTTP {} from {}", code, url)),
            Err(e) => Err(format!("{}: {}", url, e)),
        }
    }
}

fn local_path(url: &Url) -> Result<PathBuf, String> {
    url.to_file_path()
        .map_err(|()| format!("{} is not a local path", url))
}

/// Write through a `.part` file so readers never see a partial artifact
fn store<R: Read + ?Sized>(reader: &mut R, dest: &Path) -> Result<(), String> {
    let parent = dest
        .parent()
        .ok_or_else(|| format!("{} has no parent directory", dest.display()))?;
    fs::create_dir_all(parent).map_err(|e| format!("creating {}: {}", parent.display(), e))?;

    let file_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let partial = dest.with_file_name(format!("{}.part", file_name));

    let result = File::create(&partial)
        .and_then(|mut file| io::copy(reader, &mut file).and_then(|_| file.sync_all()))
        .and_then(|()| fs::rename(&partial, dest));

    if let Err(e) = result {
        let _ = fs::remove_file(&partial);
        return Err(format!("writing {}: {}", dest.display(), e));
    }
    Ok(())
}
