//! Rolling-window statistics over request events
//!
//! Every figure is recomputed from a snapshot taken at call time; there is no
//! incremental aggregation. An empty window yields `0.0`, never NaN.

use super::types::RequestEvent;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-endpoint breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub success_rate: f64,
    pub average_response_time: f64,
    /// Average over the last hour only
    pub recent_response_time: f64,
}

/// Statistics engine bound to one snapshot and one reference time
#[derive(Debug, Clone)]
pub struct RollingStatsEngine {
    requests: Vec<RequestEvent>,
    now: DateTime<Utc>,
}

/// Start of a window of `hours` (fractional allowed) ending at `now`
///
/// NaN and negative windows are empty; windows reaching past the earliest
/// representable time cover everything.
pub fn window_start(now: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    let hours = if hours.is_nan() { 0.0 } else { hours.max(0.0) };
    let millis = (hours * 3_600_000.0).round() as i64;
    Duration::try_milliseconds(millis)
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl RollingStatsEngine {
    pub fn new(requests: Vec<RequestEvent>, now: DateTime<Utc>) -> Self {
        Self { requests, now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn in_window<'a>(
        &'a self,
        hours: f64,
        endpoint: Option<&'a str>,
    ) -> impl Iterator<Item = &'a RequestEvent> + 'a {
        let start = window_start(self.now, hours);
        self.requests.iter().filter(move |e| {
            e.timestamp >= start && endpoint.is_none_or(|ep| e.endpoint == ep)
        })
    }

    /// Number of requests in the window
    pub fn request_count(&self, hours: f64) -> usize {
        self.in_window(hours, None).count()
    }

    /// Failed requests as a percentage of all requests in the window
    pub fn error_rate(&self, hours: f64) -> f64 {
        let (total, failed) = self
            .in_window(hours, None)
            .fold((0usize, 0usize), |(t, f), e| (t + 1, f + usize::from(!e.success)));

        if total == 0 {
            return 0.0;
        }
        failed as f64 / total as f64 * 100.0
    }

    /// Mean processing time in the window, optionally for one endpoint
    pub fn avg_response_time(&self, hours: f64, endpoint: Option<&str>) -> f64 {
        mean(self.in_window(hours, endpoint).map(|e| e.processing_time))
    }

    /// Breakdown for every endpoint present in the snapshot
    pub fn endpoint_stats(&self) -> BTreeMap<String, EndpointStats> {
        let mut grouped: BTreeMap<&str, Vec<&RequestEvent>> = BTreeMap::new();
        for event in &self.requests {
            grouped.entry(event.endpoint.as_str()).or_default().push(event);
        }

        grouped
            .into_iter()
            .map(|(endpoint, events)| {
                let total = events.len() as u64;
                let successful = events.iter().filter(|e| e.success).count() as u64;
                let stats = EndpointStats {
                    total_requests: total,
                    successful_requests: successful,
                    success_rate: successful as f64 / total as f64 * 100.0,
                    average_response_time: mean(events.iter().map(|e| e.processing_time)),
                    recent_response_time: self.avg_response_time(1.0, Some(endpoint)),
                };
                (endpoint.to_string(), stats)
            })
            .collect()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(endpoint: &str, time: f64, success: bool, age_minutes: i64) -> RequestEvent {
        RequestEvent::new(endpoint, time, success).at(Utc::now() - Duration::minutes(age_minutes))
    }

    #[test]
    fn test_empty_window_is_zero() {
        let stats = RollingStatsEngine::new(Vec::new(), Utc::now());
        assert_eq!(stats.error_rate(1.0), 0.0);
        assert_eq!(stats.avg_response_time(1.0, None), 0.0);
        assert!(stats.endpoint_stats().is_empty());
    }

    #[test]
    fn test_error_rate_exact() {
        for (n, k) in [(1usize, 0usize), (1, 1), (15, 4), (7, 3), (100, 11)] {
            let events = (0..n)
                .map(|i| event("tts", 1.0, i >= k, 1))
                .collect::<Vec<_>>();
            let stats = RollingStatsEngine::new(events, Utc::now());
            assert_eq!(stats.error_rate(1.0), k as f64 / n as f64 * 100.0);
        }
    }

    #[test]
    fn test_window_excludes_old_events() {
        let events = vec![
            event("tts", 2.0, false, 120),
            event("tts", 4.0, true, 30),
            event("tts", 6.0, true, 10),
        ];
        let stats = RollingStatsEngine::new(events, Utc::now());

        assert_eq!(stats.request_count(1.0), 2);
        assert_eq!(stats.error_rate(1.0), 0.0);
        assert_eq!(stats.avg_response_time(1.0, None), 5.0);
        assert_eq!(stats.request_count(3.0), 3);
        assert_eq!(stats.avg_response_time(3.0, None), 4.0);
    }

    #[test]
    fn test_fractional_window() {
        let events = vec![event("tts", 1.0, true, 45), event("tts", 3.0, false, 15)];
        let stats = RollingStatsEngine::new(events, Utc::now());

        assert_eq!(stats.request_count(0.5), 1);
        assert_eq!(stats.error_rate(0.5), 100.0);
    }

    #[test]
    fn test_unbounded_window_covers_everything() {
        let now = Utc::now();
        assert_eq!(window_start(now, f64::INFINITY), DateTime::<Utc>::MIN_UTC);
        assert_eq!(window_start(now, 1e12), DateTime::<Utc>::MIN_UTC);
        assert_eq!(window_start(now, f64::NAN), now);
        assert_eq!(window_start(now, -3.0), now);

        let events = vec![event("tts", 2.0, false, 60 * 24 * 365), event("tts", 4.0, true, 5)];
        let stats = RollingStatsEngine::new(events, now);
        assert_eq!(stats.error_rate(1e12), 50.0);
        assert_eq!(stats.avg_response_time(f64::INFINITY, None), 3.0);
        assert_eq!(stats.request_count(f64::NAN), 0);
        assert_eq!(RollingStatsEngine::new(Vec::new(), now).error_rate(1e12), 0.0);
    }

    #[test]
    fn test_avg_response_time_by_endpoint() {
        let events = vec![
            event("text_to_speech", 2.0, true, 5),
            event("voice_cloning", 10.0, true, 5),
            event("voice_cloning", 20.0, true, 5),
        ];
        let stats = RollingStatsEngine::new(events, Utc::now());

        assert_eq!(stats.avg_response_time(1.0, Some("voice_cloning")), 15.0);
        assert_eq!(stats.avg_response_time(1.0, Some("text_to_speech")), 2.0);
        assert_eq!(stats.avg_response_time(1.0, Some("vllm")), 0.0);
    }

    #[test]
    fn test_endpoint_stats() {
        let events = vec![
            event("voice_cloning", 4.0, true, 180),
            event("voice_cloning", 8.0, false, 5),
            event("text_to_speech", 1.0, true, 5),
        ];
        let stats = RollingStatsEngine::new(events, Utc::now()).endpoint_stats();

        let cloning = &stats["voice_cloning"];
        assert_eq!(cloning.total_requests, 2);
        assert_eq!(cloning.successful_requests, 1);
        assert_eq!(cloning.success_rate, 50.0);
        assert_eq!(cloning.average_response_time, 6.0);
        assert_eq!(cloning.recent_response_time, 8.0);
        assert_eq!(stats["text_to_speech"].success_rate, 100.0);
    }
}
