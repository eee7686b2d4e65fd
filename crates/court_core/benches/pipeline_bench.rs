//! Pipeline throughput on synthetic rallies.
//!
//! Run with: cargo bench --package court_core

use court_core::config::PipelineConfig;
use court_core::{detect_shots, BoundingBox, CourtPipeline, MatchInput, PlayerFrame};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn court_keypoints() -> Vec<f64> {
    vec![
        400.0, 150.0, 880.0, 150.0, 250.0, 620.0, 1030.0, 620.0, 440.0, 150.0, 300.0, 620.0,
        840.0, 150.0, 980.0, 620.0, 425.0, 230.0, 855.0, 230.0, 330.0, 530.0, 950.0, 530.0,
        640.0, 230.0, 640.0, 530.0,
    ]
}

fn ball_at(frame: usize) -> BoundingBox {
    let phase = frame % 80;
    let level = if phase <= 40 { phase } else { 80 - phase };
    let y = 200.0 + 8.0 * level as f64;
    BoundingBox::new(637.0, y - 4.0, 643.0, y + 4.0)
}

fn synthetic_match(frames: usize) -> MatchInput {
    let player_detections = (0..frames)
        .map(|f| {
            let sway = (f as f64 * 0.05).sin() * 20.0;
            let mut frame = PlayerFrame::new();
            frame.insert(1, BoundingBox::new(620.0 + sway, 90.0, 660.0 + sway, 180.0));
            frame.insert(2, BoundingBox::new(600.0 - sway, 480.0, 680.0 - sway, 640.0));
            frame.insert(3, BoundingBox::new(1200.0, 50.0, 1230.0, 100.0));
            frame
        })
        .collect();
    let ball_detections = (0..frames)
        .map(|f| if f % 7 == 3 { None } else { Some(ball_at(f)) })
        .collect();

    MatchInput {
        frame_width: 1280,
        frame_height: 720,
        court_keypoints: court_keypoints(),
        player_detections,
        ball_detections,
    }
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Court Pipeline");
    let pipeline = CourtPipeline::default();

    for &frames in &[240usize, 1_440, 7_200] {
        let input = synthetic_match(frames);
        group.throughput(Throughput::Elements(frames as u64));
        group.bench_with_input(BenchmarkId::new("run", frames), &input, |b, input| {
            b.iter(|| pipeline.run(black_box(input)).unwrap());
        });
    }

    group.finish();
}

fn bench_shot_detection(c: &mut Criterion) {
    let config = PipelineConfig::default().shot_detection;
    let ball: Vec<BoundingBox> = (0..7_200).map(ball_at).collect();

    c.bench_function("detect_shots_7200", |b| {
        b.iter(|| detect_shots(black_box(&ball), &config));
    });
}

criterion_group!(benches, bench_pipeline, bench_shot_detection);
criterion_main!(benches);
