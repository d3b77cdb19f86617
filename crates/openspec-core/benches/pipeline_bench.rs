use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use openspec_core::{classify, optimize, spec_parser, templates::BLOG_SPEC};

const DESCRIPTIONS: &[&str] = &[
    "简单的个人博客，支持文章和评论",
    "企业级电商平台，包含购物车、订单和支付",
    "a realtime chat community with login and image upload",
];

const SAMPLE_CODE: &str = r#"function getUser(id) {
  const sql = "SELECT * FROM users WHERE id = '" + id + "'";
  return db.query(sql);
}"#;

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(DESCRIPTIONS.len() as u64));
    group.bench_function("descriptions", |b| {
        b.iter(|| {
            for description in DESCRIPTIONS {
                black_box(classify(black_box(description)));
            }
        })
    });
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_blog_spec", |b| {
        b.iter(|| black_box(spec_parser::parse(black_box(BLOG_SPEC))))
    });
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize");
    for &copies in &[1usize, 50] {
        let code = SAMPLE_CODE.repeat(copies);
        group.throughput(Throughput::Bytes(code.len() as u64));
        group.bench_with_input(BenchmarkId::new("pipeline", copies), &code, |b, code| {
            b.iter(|| black_box(optimize(black_box(code), BLOG_SPEC, Some("更快"))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_parse, bench_optimize);
criterion_main!(benches);
