// Test double for the Transport boundary.
//
// MockTransport serves canned bodies per URL, can fail a URL always or for
// its first N calls, and records call counts, call instants and the peak
// number of concurrent requests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::time::Instant;

use crate::error::FetchError;
use crate::transport::Transport;

enum Behavior {
    Serve(Bytes),
    Fail(u16),
    FailThenServe { failures: usize, body: Bytes },
}

pub struct MockTransport {
    behaviors: HashMap<String, Behavior>,
    latency: Duration,
    calls: Mutex<Vec<(String, Instant)>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn on_url(mut self, url: &str, body: &[u8]) -> Self {
        self.behaviors
            .insert(url.to_string(), Behavior::Serve(Bytes::copy_from_slice(body)));
        self
    }

    pub fn failing(mut self, url: &str, status: u16) -> Self {
        self.behaviors.insert(url.to_string(), Behavior::Fail(status));
        self
    }

    pub fn flaky(mut self, url: &str, failures: usize, body: &[u8]) -> Self {
        self.behaviors.insert(
            url.to_string(),
            Behavior::FailThenServe {
                failures,
                body: Bytes::copy_from_slice(body),
            },
        );
        self
    }

    /// Simulated time each request takes.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(u, _)| u == url).count()
    }

    pub fn call_instants(&self, url: &str) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == url)
            .map(|(_, at)| *at)
            .collect()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<Bytes, FetchError> {
        let prior_calls = {
            let mut calls = self.calls.lock().unwrap();
            let prior = calls.iter().filter(|(u, _)| u == url).count();
            calls.push((url.to_string(), Instant::now()));
            prior
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.behaviors.get(url) {
            Some(Behavior::Serve(body)) => Ok(body.clone()),
            Some(Behavior::FailThenServe { failures, body }) if prior_calls >= *failures => {
                Ok(body.clone())
            }
            Some(Behavior::FailThenServe { .. }) => Err(FetchError::Status {
                status: 503,
                url: url.to_string(),
            }),
            Some(Behavior::Fail(status)) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(FetchError::Network(format!("MockTransport: no route for {url}"))),
        }
    }
}
