//! Prometheus text exposition of health and request metrics

use super::types::HealthMetrics;
use crate::monitoring::tracker::TrackerCounters;
use std::fmt::Write;

fn gauge(out: &mut String, name: &str, help: &str, value: f64) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} gauge", name);
    let _ = writeln!(out, "{} {}", name, value);
}

fn escape(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn bound(value: f64) -> String {
    if value.is_infinite() {
        "+Inf".to_string()
    } else {
        value.to_string()
    }
}

/// Render metrics in text format version 0.0.4
pub fn render(metrics: &HealthMetrics, counters: &TrackerCounters, uptime_seconds: f64) -> String {
    let mut out = String::new();

    gauge(&mut out, "higgs_audio_uptime_seconds", "Process uptime in seconds", uptime_seconds);
    gauge(&mut out, "higgs_audio_memory_usage_gb", "Memory usage in GB", metrics.memory_usage_gb);
    gauge(&mut out, "higgs_audio_gpu_memory_gb", "GPU memory usage in GB", metrics.gpu_memory_gb);
    gauge(
        &mut out,
        "higgs_audio_gpu_utilization_percent",
        "GPU utilization percentage",
        metrics.gpu_utilization_percent,
    );
    gauge(
        &mut out,
        "higgs_audio_active_requests",
        "Number of active requests",
        metrics.active_requests as f64,
    );
    gauge(
        &mut out,
        "higgs_audio_error_rate_1h_percent",
        "Request error rate over the last hour",
        metrics.error_rate,
    );

    let _ = writeln!(out, "# HELP higgs_audio_requests_total Total number of requests");
    let _ = writeln!(out, "# TYPE higgs_audio_requests_total counter");
    for ((voice, status), count) in &counters.requests_by_voice {
        let _ = writeln!(
            out,
            "higgs_audio_requests_total{{voice=\"{}\",status=\"{}\"}} {}",
            escape(voice),
            status,
            count
        );
    }

    let _ = writeln!(
        out,
        "# HELP higgs_audio_request_duration_seconds Request duration in seconds"
    );
    let _ = writeln!(out, "# TYPE higgs_audio_request_duration_seconds histogram");
    for (voice, histogram) in &counters.durations_by_voice {
        let voice = escape(voice);
        for (le, count) in histogram.cumulative() {
            let _ = writeln!(
                out,
                "higgs_audio_request_duration_seconds_bucket{{voice=\"{}\",le=\"{}\"}} {}",
                voice,
                bound(le),
                count
            );
        }
        let _ = writeln!(
            out,
            "higgs_audio_request_duration_seconds_sum{{voice=\"{}\"}} {}",
            voice, histogram.sum
        );
        let _ = writeln!(
            out,
            "higgs_audio_request_duration_seconds_count{{voice=\"{}\"}} {}",
            voice, histogram.count
        );
    }

    out
}
