//! Bitmap sources and how their bytes are fetched.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use reqwest::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use url::Url;

use crate::error::FetchError;

/// Where a bitmap comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitmapSource {
    /// A remote `http`/`https` resource.
    Url(Url),
    /// A file on the local filesystem.
    Path(PathBuf),
    /// Inline `data:` URI.
    DataUri(String),
}

impl FromStr for BitmapSource {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FetchError::InvalidSource("empty source".to_string()));
        }
        if s.starts_with("data:") {
            return Ok(Self::DataUri(s.to_string()));
        }

        match Url::parse(s) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Self::Url(url)),
                "file" => url
                    .to_file_path()
                    .map(Self::Path)
                    .map_err(|()| FetchError::InvalidSource(s.to_string())),
                // Windows drive letters parse as one-letter schemes.
                scheme if scheme.len() == 1 => Ok(Self::Path(PathBuf::from(s))),
                scheme => Err(FetchError::InvalidSource(format!(
                    "unsupported scheme '{scheme}'"
                ))),
            },
            Err(_) => Ok(Self::Path(PathBuf::from(s))),
        }
    }
}

impl fmt::Display for BitmapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::DataUri(uri) => {
                let header = uri.split(',').next().unwrap_or("data:");
                write!(f, "{header},... ({} bytes)", uri.len())
            }
        }
    }
}

/// How remote bitmaps are requested, like an image element's `crossOrigin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchMode {
    /// Ask for cross-origin access; fail if the server does not grant it.
    #[default]
    Cors,
    /// Load anything, but the pixels may not be read back afterwards.
    NoCors,
}

impl FromStr for FetchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cors" | "anonymous" => Ok(Self::Cors),
            "no-cors" | "nocors" => Ok(Self::NoCors),
            other => Err(format!("unknown fetch mode '{other}' (expected cors or no-cors)")),
        }
    }
}

/// Raw bytes of a fetched bitmap.
#[derive(Debug, Clone)]
pub struct FetchedBitmap {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Whether the pixels may be read back once drawn.
    pub readback_permitted: bool,
}

/// Fetches the bytes behind a [`BitmapSource`].
#[allow(async_fn_in_trait)]
pub trait BitmapFetcher {
    /// Fetch the raw bytes of `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the bytes cannot be obtained.
    async fn fetch(&self, source: &BitmapSource) -> Result<FetchedBitmap, FetchError>;
}

/// Fetcher for URLs, local files and data URIs.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    http: reqwest::Client,
    mode: FetchMode,
    origin: String,
}

impl SourceFetcher {
    /// Create a fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the HTTP client cannot be built.
    pub fn new(mode: FetchMode, origin: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("canvas-app/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            mode,
            origin: origin.into(),
        })
    }

    async fn fetch_url(&self, url: &Url) -> Result<FetchedBitmap, FetchError> {
        let mut request = self.http.get(url.clone());
        if self.mode == FetchMode::Cors {
            request = request.header(ORIGIN, self.origin.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if self.mode == FetchMode::Cors {
            let allowed = response
                .headers()
                .get(ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == "*" || v == self.origin);
            if !allowed {
                return Err(FetchError::CorsRejected(url.to_string()));
            }
        }

        let bytes = response.bytes().await?.to_vec();
        tracing::debug!("Fetched {} bytes from {url}", bytes.len());
        Ok(FetchedBitmap {
            bytes,
            readback_permitted: self.mode == FetchMode::Cors,
        })
    }
}

impl BitmapFetcher for SourceFetcher {
    async fn fetch(&self, source: &BitmapSource) -> Result<FetchedBitmap, FetchError> {
        match source {
            BitmapSource::Url(url) => self.fetch_url(url).await,
            BitmapSource::Path(path) => {
                let bytes = tokio::fs::read(path).await?;
                Ok(FetchedBitmap {
                    bytes,
                    readback_permitted: true,
                })
            }
            BitmapSource::DataUri(uri) => {
                let bytes = canvas_renderer::image::data_uri_bytes(uri)
                    .map_err(|e| FetchError::DataUri(e.to_string()))?;
                Ok(FetchedBitmap {
                    bytes,
                    readback_permitted: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources() {
        assert!(matches!(
            "https://example.com/a.png".parse::<BitmapSource>(),
            Ok(BitmapSource::Url(_))
        ));
        assert!(matches!(
            "data:image/png;base64,AAAA".parse::<BitmapSource>(),
            Ok(BitmapSource::DataUri(_))
        ));
        assert_eq!(
            "images/cat.png".parse::<BitmapSource>().ok(),
            Some(BitmapSource::Path(PathBuf::from("images/cat.png")))
        );
        assert!(matches!(
            "ftp://example.com/a.png".parse::<BitmapSource>(),
            Err(FetchError::InvalidSource(_))
        ));
        assert!("  ".parse::<BitmapSource>().is_err());
    }

    #[test]
    fn test_data_uri_display_is_short() {
        let long = format!("data:image/png;base64,{}", "A".repeat(4000));
        let source: BitmapSource = long.parse().expect("data uri");
        let shown = source.to_string();
        assert!(shown.starts_with("data:image/png;base64,"));
        assert!(shown.len() < 64);
    }

    #[test]
    fn test_fetch_mode_parsing() {
        assert_eq!("cors".parse::<FetchMode>(), Ok(FetchMode::Cors));
        assert_eq!("no-cors".parse::<FetchMode>(), Ok(FetchMode::NoCors));
        assert!("bogus".parse::<FetchMode>().is_err());
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bytes.bin");
        std::fs::write(&path, b"abc").expect("write");

        let fetcher = SourceFetcher::new(FetchMode::Cors, "http://localhost").expect("fetcher");
        let fetched = fetcher
            .fetch(&BitmapSource::Path(path))
            .await
            .expect("fetch");
        assert_eq!(fetched.bytes, b"abc");
        assert!(fetched.readback_permitted);
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let fetcher = SourceFetcher::new(FetchMode::Cors, "http://localhost").expect("fetcher");
        let err = fetcher
            .fetch(&BitmapSource::Path(PathBuf::from("/definitely/not/here.png")))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }
}
