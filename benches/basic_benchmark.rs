use criterion::{black_box, criterion_group, criterion_main, Criterion};

use zfx_mixer::mixer::{all_except_self, random_k, Mixable};
use zfx_mixer::model::AveragingModel;
use zfx_mixer::peer::Peer;

fn make_peers(n: u16) -> Vec<Peer> {
    (0..n).map(|i| Peer::new("10.0.0.1", 9000 + i)).collect()
}

pub fn run_selector_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector_benchmark");
    let peers = make_peers(1000);
    let my_id = peers[0].clone();

    let select_all = all_except_self();
    group.bench_function("all_except_self_1000", |b| {
        b.iter(|| black_box(select_all(&peers, &my_id)))
    });

    let select_random = random_k(8);
    group.bench_function("random_k_8_of_1000", |b| {
        b.iter(|| black_box(select_random(&peers, &my_id)))
    });

    group.finish();
}

pub fn run_model_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_benchmark");

    let mut a = AveragingModel::new(1024);
    let mut b_model = AveragingModel::new(1024);
    let sample: Vec<f64> = (0..1024).map(|i| i as f64).collect();
    a.observe(&sample);
    b_model.observe(&sample);

    let arg = a.get_argument().unwrap();
    group.bench_function("pull_1024", |bench| {
        bench.iter(|| black_box(b_model.pull(&arg).unwrap()))
    });

    let diff = b_model.pull(&arg).unwrap();
    group.bench_function("push_1024", |bench| {
        bench.iter(|| a.push(black_box(&diff)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, run_selector_benchmark, run_model_benchmark);
criterion_main!(benches);
