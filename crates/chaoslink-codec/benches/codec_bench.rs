// ─────────────────────────────────────────────────────────────────────
// ChaosLink — Codec Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the masking round trip and the binary
//! modulation pipeline.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chaoslink_codec::{
    embed_binary, embed_message, recover_message, BitModulation, BitStepSignal, EmbedConfig,
    RecoverConfig,
};
use chaoslink_dynamics::LorenzParams;
use chaoslink_types::{ConstSignal, Signal, SolverConfig, State, TimeSpan};

const U0: State = [2.2, 1.3, 2.0];

fn bench_embed_1s(c: &mut Criterion) {
    let span = TimeSpan::new(0.0, 1.0).expect("valid span");
    let cfg = EmbedConfig::default();
    c.bench_function("embed_1s", |b| {
        b.iter(|| {
            embed_message(
                black_box(U0),
                LorenzParams::CUOMO,
                span,
                Arc::new(ConstSignal(0.0)),
                &cfg,
            )
        })
    });
}

fn bench_round_trip_1s(c: &mut Criterion) {
    let span = TimeSpan::new(0.0, 1.0).expect("valid span");
    let embed_cfg = EmbedConfig::default();
    let recover_cfg = RecoverConfig::default();
    c.bench_function("round_trip_1s", |b| {
        b.iter(|| {
            let secret = embed_message(
                black_box(U0),
                LorenzParams::CUOMO,
                span,
                Arc::new(ConstSignal(0.0)),
                &embed_cfg,
            )
            .expect("embed");
            recover_message(
                U0,
                LorenzParams::CUOMO,
                span,
                Arc::new(secret),
                &recover_cfg,
            )
        })
    });
}

fn bench_binary_embed_3_bits(c: &mut Criterion) {
    let bits = BitStepSignal::from_bits("101", BitModulation::default()).expect("valid bits");
    let span = TimeSpan::new(0.0, bits.duration()).expect("valid span");
    let cfg = SolverConfig::default();
    let bits: Arc<dyn Signal> = Arc::new(bits);
    c.bench_function("binary_embed_3_bits", |b| {
        b.iter(|| {
            embed_binary(
                black_box(U0),
                LorenzParams::CUOMO,
                span,
                bits.clone(),
                &cfg,
            )
        })
    });
}

criterion_group!(
    benches,
    bench_embed_1s,
    bench_round_trip_1s,
    bench_binary_embed_3_bits,
);
criterion_main!(benches);
