use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use shift_logging::shift_info;
use url::Url;

use crate::{TransportError, TransportFailureKind};

const CONVERT_SEGMENTS: [&str; 2] = ["api", "convert-stream"];
const DOWNLOAD_SEGMENTS: [&str; 2] = ["api", "download"];

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// An open response body.
pub struct ResponseBody {
    pub content_type: Option<String>,
    pub chunks: ByteStream,
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Maximum silence between two body chunks. There is no whole-request
    /// timeout; conversions stream for minutes.
    pub read_timeout: Duration,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(300),
        }
    }
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Uploads `archive` and returns the streamed conversion response.
    async fn open_stream(&self, archive: &Path) -> Result<ResponseBody, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploadSettings,
}

impl ReqwestUploader {
    pub fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, TransportError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .read_timeout(self.settings.read_timeout)
            .build()
            .map_err(|err| TransportError::new(TransportFailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn open_stream(&self, archive: &Path) -> Result<ResponseBody, TransportError> {
        let url = endpoint(&self.settings.base_url, &CONVERT_SEGMENTS)?;
        let bytes = tokio::fs::read(archive).await.map_err(|err| {
            TransportError::new(
                TransportFailureKind::ArchiveUnreadable,
                format!("{}: {err}", archive.display()),
            )
        })?;
        let file_name = archive
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project.zip".to_string());

        shift_info!(
            "Uploading {} ({} bytes) to {}",
            file_name,
            bytes.len(),
            url
        );

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/zip")
            .map_err(map_reqwest_error)?;
        let form = Form::new().part("file", part);

        let client = self.build_client()?;
        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(
                TransportFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let chunks = response.bytes_stream().map(|chunk| {
            chunk.map_err(|err| {
                let mut mapped = map_reqwest_error(err);
                if mapped.kind == TransportFailureKind::Network {
                    mapped.kind = TransportFailureKind::Body;
                }
                mapped
            })
        });

        Ok(ResponseBody {
            content_type,
            chunks: Box::pin(chunks),
        })
    }
}

/// Location of the packaged output for `download_id`. The client hands this
/// to the user; it never fetches it itself.
pub fn download_url(base_url: &str, download_id: &str) -> Result<Url, TransportError> {
    let mut url = endpoint(base_url, &DOWNLOAD_SEGMENTS)?;
    url.path_segments_mut()
        .map_err(|_| invalid_base(base_url))?
        .push(download_id);
    Ok(url)
}

fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, TransportError> {
    let mut url = Url::parse(base_url)
        .map_err(|err| TransportError::new(TransportFailureKind::InvalidUrl, err.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid_base(base_url))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn invalid_base(base_url: &str) -> TransportError {
    TransportError::new(
        TransportFailureKind::InvalidUrl,
        format!("{base_url} cannot be used as a base url"),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(TransportFailureKind::Timeout, err.to_string());
    }
    TransportError::new(TransportFailureKind::Network, err.to_string())
}
