//! Where the module file comes from: stdin, a local path, or a URL.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use url::Url;

use expmod_core::{Access, HttpFetcher};

const RAW_CONTENT_HOST: &str = "raw.githubusercontent.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    Stdin,
    File(PathBuf),
    Url(Url),
}

impl ManifestSource {
    /// `None` and `-` mean stdin; `http://` and `https://` arguments are URLs.
    pub fn from_arg(arg: Option<&str>) -> Result<Self> {
        match arg {
            None | Some("-") => Ok(Self::Stdin),
            Some(arg) if arg.starts_with("http://") || arg.starts_with("https://") => {
                let url = Url::parse(arg).with_context(|| format!("invalid URL '{arg}'"))?;
                Ok(Self::Url(raw_content_url(url)))
            }
            Some(path) => Ok(Self::File(PathBuf::from(path))),
        }
    }

    pub async fn read(&self, http: &HttpFetcher) -> Result<String> {
        match self {
            Self::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("reading standard input")?;
                Ok(text)
            }
            Self::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display())),
            Self::Url(url) => Ok(http
                .get_text(url.as_str(), Access::Public)
                .await
                .with_context(|| format!("downloading {url}"))?),
        }
    }
}

/// Rewrite a GitHub `blob` page URL to its raw-content equivalent; any
/// other URL is returned unchanged.
pub fn raw_content_url(url: Url) -> Url {
    if url.host_str() != Some("github.com") {
        return url;
    }
    let segments: Vec<&str> = match url.path_segments() {
        Some(segments) => segments.collect(),
        None => return url,
    };
    if segments.len() < 5 || segments[2] != "blob" {
        return url;
    }

    let mut raw = url.clone();
    if raw.set_host(Some(RAW_CONTENT_HOST)).is_err() || raw.set_scheme("https").is_err() {
        return url;
    }
    let rest = [&segments[..2], &segments[3..]].concat();
    raw.set_path(&rest.join("/"));
    raw.set_query(None);
    raw.set_fragment(None);
    raw
}
