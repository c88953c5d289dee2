use criterion::{criterion_group, criterion_main, Criterion};
use cssfront::testing;

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenization");
    group.significance_level(0.1).sample_size(500);

    // Fetch the files outside of the closure to avoid issues with file io
    let fixtures = testing::fixtures().collect::<Vec<_>>();

    group.bench_function("fixtures", |b| {
        b.iter(|| {
            for root in &fixtures {
                for test in &root.tests {
                    let _ = test.tokenize();
                }
            }
        })
    });

    let stylesheet = "a{color:red;margin:0 auto}\n@media (min-width:980px){div.class > p, ul li{color:rgba( 0, 0, 0, 0.5 )}}\n".repeat(500);
    let test = testing::Test {
        description: "large stylesheet".into(),
        input: stylesheet,
        positions: true,
        ..Default::default()
    };

    group.bench_function("large stylesheet", |b| {
        b.iter(|| {
            let _ = test.tokenize();
        })
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
