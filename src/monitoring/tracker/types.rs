//! Request lifecycle types

use crate::monitoring::types::Timestamped;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

/// Upper bounds of the request duration histogram, in seconds
pub const DURATION_BUCKETS: [f64; 8] = [0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0];

/// Voice label used when a request names none
pub const UNKNOWN_VOICE: &str = "unknown";

/// What is known about a request when it starts
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub endpoint: String,
    pub voice: Option<String>,
    pub text_length: usize,
}

impl RequestContext {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn with_text_length(mut self, text_length: usize) -> Self {
        self.text_length = text_length;
        self
    }
}

/// How a request ended
#[derive(Debug, Clone, Default)]
pub struct RequestOutcome {
    pub success: bool,
    pub error_message: Option<String>,
    /// Seconds of audio produced
    pub audio_duration: Option<f64>,
    pub memory_usage_gb: Option<f64>,
}

impl RequestOutcome {
    pub fn success(audio_duration: Option<f64>) -> Self {
        Self {
            success: true,
            audio_duration,
            ..Self::default()
        }
    }

    pub fn failure(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(error_message.into()),
            ..Self::default()
        }
    }

    pub fn with_memory_usage(mut self, memory_usage_gb: f64) -> Self {
        self.memory_usage_gb = Some(memory_usage_gb);
        self
    }
}

#[derive(Debug, Clone)]
pub(super) struct ActiveRequest {
    pub context: RequestContext,
    pub started_at: DateTime<Utc>,
    pub started: Instant,
}

/// A completed request
#[derive(Debug, Clone, Serialize)]
pub struct RequestRecord {
    pub request_id: String,
    pub endpoint: String,
    pub voice: Option<String>,
    pub text_length: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Seconds
    pub duration: f64,
    pub success: bool,
    pub error_message: Option<String>,
    pub audio_duration: Option<f64>,
}

impl Timestamped for RequestRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.start_time
    }
}

/// Failure entry of the detailed metrics
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    pub request_id: String,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub voice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoicePerformance {
    pub request_count: usize,
    pub average_duration: f64,
    pub success_rate: f64,
    pub average_audio_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentPerformance {
    pub requests_last_hour: usize,
    /// 100.0 when there were no requests
    pub success_rate_last_hour: f64,
    pub average_duration_last_hour: f64,
}

/// Request durations bucketed by [`DURATION_BUCKETS`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationHistogram {
    /// Non-cumulative count per bucket; the last slot counts everything above
    pub counts: [u64; DURATION_BUCKETS.len() + 1],
    pub sum: f64,
    pub count: u64,
}

impl Default for DurationHistogram {
    fn default() -> Self {
        Self {
            counts: [0; DURATION_BUCKETS.len() + 1],
            sum: 0.0,
            count: 0,
        }
    }
}

impl DurationHistogram {
    pub fn observe(&mut self, seconds: f64) {
        let slot = DURATION_BUCKETS
            .iter()
            .position(|bound| seconds <= *bound)
            .unwrap_or(DURATION_BUCKETS.len());
        self.counts[slot] += 1;
        self.sum += seconds;
        self.count += 1;
    }

    /// Cumulative counts paired with their upper bound, `+Inf` last
    pub fn cumulative(&self) -> Vec<(f64, u64)> {
        let mut total = 0;
        DURATION_BUCKETS
            .iter()
            .copied()
            .chain(std::iter::once(f64::INFINITY))
            .zip(self.counts.iter())
            .map(|(bound, count)| {
                total += count;
                (bound, total)
            })
            .collect()
    }
}

/// Lifetime request counters kept by the tracker
#[derive(Debug, Clone, Default)]
pub struct TrackerCounters {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub abandoned_requests: u64,
    /// Keyed by (voice, "success" | "error")
    pub requests_by_voice: BTreeMap<(String, &'static str), u64>,
    pub durations_by_voice: BTreeMap<String, DurationHistogram>,
}

impl TrackerCounters {
    pub(super) fn record_end(&mut self, voice: &str, success: bool, duration: f64) {
        let status = if success {
            self.successful_requests += 1;
            "success"
        } else {
            self.failed_requests += 1;
            "error"
        };
        *self
            .requests_by_voice
            .entry((voice.to_string(), status))
            .or_insert(0) += 1;
        self.durations_by_voice
            .entry(voice.to_string())
            .or_default()
            .observe(duration);
    }

    /// Lifetime failure rate, percent
    pub fn error_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.failed_requests as f64 / self.total_requests as f64 * 100.0
        }
    }
}
