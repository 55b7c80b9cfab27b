use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use duelist::beta_dist_max_prob;
use std::hint::black_box;

fn bench_beta_max(c: &mut Criterion) {
    let mut group = c.benchmark_group("beta_dist_max_prob");
    for &k in &[2usize, 4usize, 8usize] {
        // Posteriors spread over a plausible range of counts.
        let alpha: Vec<f64> = (0..k).map(|i| 1.0 + (i as f64) * 3.5).collect();
        let beta: Vec<f64> = (0..k).map(|i| 2.0 + ((k - i) as f64) * 2.0).collect();
        group.bench_with_input(BenchmarkId::new("k", k), &k, |b, &_k| {
            b.iter(|| {
                let p = beta_dist_max_prob(black_box(&alpha), black_box(&beta), 0).unwrap();
                black_box(p);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_beta_max);
criterion_main!(benches);
