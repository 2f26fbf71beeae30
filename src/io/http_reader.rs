use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, StatusCode};
use url::Url;

use super::RangeReader;
use crate::error::IoError;

/// HTTP-backed implementation of RangeReader.
///
/// Reads byte ranges from a remote file over HTTP using `Range` request
/// headers. The resource size is fetched once on creation via a HEAD request.
/// The underlying connection pool is owned by this reader and released when
/// it is dropped.
#[derive(Clone)]
pub struct HttpRangeReader {
    client: Client,
    url: Url,
    size: u64,
    identifier: String,
}

impl HttpRangeReader {
    /// Create a new HttpRangeReader for the given URL.
    ///
    /// This performs a HEAD request to determine the resource size.
    /// Returns an error if the URL is invalid, the resource does not exist,
    /// or the server does not report a content length.
    pub async fn new(client: Client, url: &str) -> Result<Self, IoError> {
        let url = Url::parse(url).map_err(|e| IoError::InvalidUrl(format!("{}: {}", url, e)))?;

        let resp = client
            .head(url.clone())
            .send()
            .await
            .map_err(|e| IoError::Connection(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(IoError::NotFound(url.to_string()));
        }
        if !resp.status().is_success() {
            return Err(IoError::Http(format!(
                "HEAD {} returned {}",
                url,
                resp.status()
            )));
        }

        let size = resp
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| IoError::Http(format!("HEAD {} returned no content length", url)))?;

        let identifier = url.to_string();

        Ok(Self {
            client,
            url,
            size,
            identifier,
        })
    }
}

/// Format an HTTP `Range` header value. The header is inclusive on both
/// ends: `bytes=start-end`.
fn range_header(offset: u64, len: usize) -> String {
    format!("bytes={}-{}", offset, offset + len as u64 - 1)
}

#[async_trait]
impl RangeReader for HttpRangeReader {
    async fn read_exact_at(&self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        // Validate range bounds; offsets come from file contents, so the
        // end position must be computed without wrapping
        let in_bounds = offset
            .checked_add(len as u64)
            .is_some_and(|end| end <= self.size);
        if !in_bounds {
            return Err(IoError::RangeOutOfBounds {
                offset,
                requested: len as u64,
                size: self.size,
            });
        }

        // Handle zero-length reads
        if len == 0 {
            return Ok(Bytes::new());
        }

        let resp = self
            .client
            .get(self.url.clone())
            .header(header::RANGE, range_header(offset, len))
            .send()
            .await
            .map_err(|e| IoError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(IoError::Http(format!(
                "GET {} returned {}",
                self.url,
                resp.status()
            )));
        }

        let data = resp
            .bytes()
            .await
            .map_err(|e| IoError::Connection(e.to_string()))?;

        if data.len() != len {
            return Err(IoError::ShortRead {
                offset,
                requested: len as u64,
                actual: data.len() as u64,
            });
        }

        Ok(data)
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
