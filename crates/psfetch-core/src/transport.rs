//! HTTP GET transport.
//!
//! The fetcher only needs "GET this URL within this timeout and give me the
//! final status and body", so that is the whole `Transport` seam. The curl
//! implementation keeps one easy handle for the whole run, which lets libcurl
//! reuse connections to the same host between files.

use anyhow::{Context, Result};
use std::time::Duration;

/// Final status and full body of one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

pub trait Transport {
    /// Perform one GET. Redirects are followed; `status` is the final one.
    /// `timeout` bounds connecting and any stretch without received data,
    /// not the length of the whole transfer.
    fn get(&mut self, url: &str, timeout: Duration) -> Result<HttpResponse, curl::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn get(&mut self, url: &str, timeout: Duration) -> Result<HttpResponse, curl::Error> {
        (**self).get(url, timeout)
    }
}

/// libcurl-backed transport.
pub struct CurlTransport {
    easy: curl::easy::Easy,
}

impl CurlTransport {
    pub fn new(user_agent: &str) -> Result<Self> {
        let mut easy = curl::easy::Easy::new();
        easy.useragent(user_agent).context("set user agent")?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        // Empty string = every encoding libcurl was built with; bodies arrive decoded.
        easy.accept_encoding("")?;
        Ok(Self { easy })
    }
}

impl std::fmt::Debug for CurlTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurlTransport").finish_non_exhaustive()
    }
}

impl Transport for CurlTransport {
    fn get(&mut self, url: &str, timeout: Duration) -> Result<HttpResponse, curl::Error> {
        self.easy.url(url)?;
        self.easy.get(true)?;
        self.easy.connect_timeout(timeout)?;
        // Abort when under 1 byte/s for the whole window; libcurl counts it in seconds.
        self.easy.low_speed_limit(1)?;
        self.easy.low_speed_time(timeout.max(Duration::from_secs(1)))?;

        let mut body = Vec::new();
        {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = self.easy.response_code()?;
        Ok(HttpResponse { status, body })
    }
}
