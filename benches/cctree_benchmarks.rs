use cctree::data::Matrix;
use cctree::splitter::{EmpiricalSplitter, SplitCriterion};
use cctree::tree::Tree;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

fn dataset(n_features: usize, n_samples: usize, seed: u64) -> (Matrix, Vec<u32>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<f64> = (0..n_features * n_samples).map(|_| rng.gen::<f64>()).collect();
    let labels = (0..n_samples)
        .map(|j| {
            if rng.gen_bool(0.1) {
                rng.gen_range(0..3)
            } else {
                ((data[j] + data[n_samples + j]) * 1.5) as u32
            }
        })
        .collect();
    (Matrix::new(data, n_features, n_samples), labels)
}

pub fn tree_benchmarks(c: &mut Criterion) {
    let (data, labels) = dataset(5, 2_000, 0);

    let mut tree = Tree::new(data.clone(), labels.clone(), SplitCriterion::Gini).unwrap();
    tree.fit_full_tree(&EmpiricalSplitter).unwrap();

    c.bench_function("Grow Full Tree", |b| {
        b.iter(|| {
            let mut train_tree = Tree::new(black_box(data.clone()), black_box(labels.clone()), SplitCriterion::Gini).unwrap();
            train_tree.fit_full_tree(black_box(&EmpiricalSplitter)).unwrap();
        })
    });
    c.bench_function("Tree Predict", |b| b.iter(|| tree.predict(black_box(&data))));

    let mut prune = c.benchmark_group("prune_tree");
    prune.warm_up_time(Duration::from_secs(5));
    prune.sample_size(20);
    prune.bench_function("cut_useless_leaves", |b| {
        b.iter(|| {
            let mut t = tree.clone();
            t.cut_useless_leaves().unwrap();
        })
    });
    prune.bench_function("cost_complexity_seq", |b| {
        b.iter(|| {
            let mut t = tree.clone();
            t.cost_complexity_seq().unwrap();
        })
    });
    prune.finish();
}

criterion_group!(benches, tree_benchmarks);
criterion_main!(benches);
