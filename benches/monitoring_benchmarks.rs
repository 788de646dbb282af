//! Benchmarks for the monitoring hot paths

use chrono::{Duration as ChronoDuration, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use higgs_audio_serverless::generation::{encode_wav, normalize_transcript};
use higgs_audio_serverless::monitoring::{EventStore, RequestEvent, RollingStatsEngine};
use std::hint::black_box;

fn bench_event_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_store");

    for capacity in [1_000usize, 10_000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("append_full", capacity),
            &capacity,
            |b, &capacity| {
                let store = EventStore::new(capacity);
                for i in 0..capacity {
                    store.append(RequestEvent::new("text_to_speech", i as f64, true));
                }
                b.iter(|| store.append(black_box(RequestEvent::new("text_to_speech", 1.0, true))));
            },
        );

        group.bench_with_input(BenchmarkId::new("snapshot", capacity), &capacity, |b, &capacity| {
            let store = EventStore::new(capacity);
            for i in 0..capacity {
                store.append(RequestEvent::new("voice_cloning", i as f64, i % 7 != 0));
            }
            b.iter(|| black_box(store.snapshot()));
        });
    }

    group.finish();
}

fn bench_rolling_stats(c: &mut Criterion) {
    let now = Utc::now();
    let events: Vec<_> = (0..10_000)
        .map(|i| {
            let endpoint = if i % 3 == 0 { "voice_cloning" } else { "text_to_speech" };
            RequestEvent::new(endpoint, (i % 20) as f64, i % 11 != 0)
                .at(now - ChronoDuration::seconds(i * 5))
        })
        .collect();
    let stats = RollingStatsEngine::new(events, now);

    let mut group = c.benchmark_group("rolling_stats");
    group.bench_function("error_rate_1h", |b| b.iter(|| black_box(stats.error_rate(1.0))));
    group.bench_function("avg_response_time_1h", |b| {
        b.iter(|| black_box(stats.avg_response_time(1.0, Some("voice_cloning"))))
    });
    group.bench_function("endpoint_stats", |b| b.iter(|| black_box(stats.endpoint_stats())));
    group.finish();
}

fn bench_audio(c: &mut Criterion) {
    let samples: Vec<f32> = (0..24_000).map(|i| (i as f32 / 24.0).sin()).collect();
    let transcript = "[SPEAKER0] Hello（world）! [laugh] It is 72°F today\n\n[SPEAKER1] Great";

    let mut group = c.benchmark_group("audio");
    group.throughput(Throughput::Elements(samples.len() as u64));
    group.bench_function("encode_wav_1s", |b| b.iter(|| encode_wav(black_box(&samples), 24_000)));
    group.bench_function("normalize_transcript", |b| {
        b.iter(|| normalize_transcript(black_box(transcript)))
    });
    group.finish();
}

criterion_group!(benches, bench_event_store, bench_rolling_stats, bench_audio);
criterion_main!(benches);
