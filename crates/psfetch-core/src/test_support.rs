//! Scripted transport and recording sleeper shared by unit tests.

use std::collections::VecDeque;
use std::time::Duration;

use crate::fetcher::ResilientFetcher;
use crate::retry::{RetryPolicy, Sleeper};
use crate::transport::{HttpResponse, Transport};

/// Replies to successive GETs from a fixed script, recording each request.
#[derive(Debug, Default)]
pub struct Scripted {
    replies: VecDeque<Result<HttpResponse, curl::Error>>,
    urls: Vec<String>,
    timeouts: Vec<Duration>,
}

impl Scripted {
    pub fn new(replies: Vec<HttpResponse>) -> Self {
        Self::from_results(replies.into_iter().map(Ok).collect())
    }

    pub fn from_results(replies: Vec<Result<HttpResponse, curl::Error>>) -> Self {
        Self {
            replies: replies.into(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.urls.len()
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.clone()
    }
}

impl Transport for Scripted {
    fn get(&mut self, url: &str, timeout: Duration) -> Result<HttpResponse, curl::Error> {
        self.urls.push(url.to_string());
        self.timeouts.push(timeout);
        self.replies
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted GET {}", url))
    }
}

#[derive(Debug, Default)]
pub struct RecordingSleeper {
    pub delays: Vec<Duration>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, delay: Duration) {
        self.delays.push(delay);
    }
}

pub fn ok(body: &[u8]) -> HttpResponse {
    HttpResponse {
        status: 200,
        body: body.to_vec(),
    }
}

pub fn status(code: u32) -> HttpResponse {
    HttpResponse {
        status: code,
        body: format!("status {}", code).into_bytes(),
    }
}

pub fn fetcher(transport: Scripted) -> ResilientFetcher<Scripted, RecordingSleeper> {
    ResilientFetcher::with_sleeper(transport, RecordingSleeper::default(), RetryPolicy::default())
}
