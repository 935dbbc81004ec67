// Benchmarks for circuit preparation and shot sampling.
//
// The presets are tiny (8 amplitudes), so these mostly track per-request
// overhead: allocation, gate dispatch, and the cumulative-probability scan.
// The 12-qubit case exercises the same code on a register large enough for
// the scan to dominate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use quantum_melody_sim::prng::ShotRng;
use quantum_melody_sim::{Emotion, GateOp, StateVector};

fn bench_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("preset");
    for emotion in Emotion::ALL {
        let circuit = emotion.circuit();
        group.bench_function(emotion.label(), |b| {
            let mut rng = ShotRng::new(1);
            b.iter(|| {
                let state = circuit.prepare().unwrap();
                black_box(state.sample_shots(16, &mut rng).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_wide_register(c: &mut Criterion) {
    let gates: Vec<GateOp> = (0..12).map(GateOp::Hadamard).collect();
    let mut state = StateVector::new(12).unwrap();
    state.apply_all(&gates).unwrap();
    c.bench_function("sample_1024_shots_12_qubits", |b| {
        let mut rng = ShotRng::new(2);
        b.iter(|| black_box(state.sample_shots(1024, &mut rng).unwrap()))
    });
}

criterion_group!(benches, bench_presets, bench_wide_register);
criterion_main!(benches);
