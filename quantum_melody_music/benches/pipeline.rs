// Benchmark for one full request: simulate, map, render, encode.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use quantum_melody_music::pipeline::{MelodyRequest, generate};
use quantum_melody_music::{MelodyConfig, SmfRenderer};
use quantum_melody_sim::prng::ShotRng;

fn bench_generate(c: &mut Criterion) {
    let config = MelodyConfig::default();
    let renderer = SmfRenderer::from_config(&config);
    for label in ["happy", "sad", "calm", "mixed"] {
        let request = MelodyRequest::new(label);
        c.bench_function(&format!("generate_{label}"), |b| {
            let mut rng = ShotRng::new(1);
            b.iter(|| black_box(generate(&request, &config, &mut rng, &renderer).unwrap()))
        });
    }
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
