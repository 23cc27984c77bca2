use criterion::{Criterion, black_box, criterion_group, criterion_main};
use predsql::{ParameterWriter, QueryStringBuilder, SelectQuery, compile};

fn wide_predicate(terms: usize) -> String {
    let body = (0..terms)
        .map(|i| format!("(x.f{i} == {i} || x.g{i} != 'v{i}')"))
        .collect::<Vec<_>>()
        .join(" && ");
    format!("x => {body}")
}

fn bench_compile_simple(c: &mut Criterion) {
    let source = "x => x.mySpecialField == 2 && x.myOtherField == null";

    c.bench_function("compile_simple_predicate", |b| {
        b.iter(|| compile(black_box(source)).unwrap())
    });
}

fn bench_compile_wide(c: &mut Criterion) {
    let source = wide_predicate(64);

    c.bench_function("compile_wide_predicate", |b| {
        b.iter(|| compile(black_box(&source)).unwrap())
    });
}

fn bench_render(c: &mut Criterion) {
    let predicate = compile(&wide_predicate(64)).unwrap();

    c.bench_function("render_wide_predicate", |b| {
        b.iter(|| {
            let text = black_box(&predicate).to_raw_string();
            let params = black_box(&predicate).parameters();
            (text, params)
        })
    });
}

fn bench_select(c: &mut Criterion) {
    let predicate = compile(&wide_predicate(16)).unwrap();
    let query = SelectQuery::new("entities")
        .fields(["id", "name"])
        .filter(predicate);

    c.bench_function("build_select", |b| b.iter(|| black_box(&query).build()));
}

criterion_group!(
    hot_paths,
    bench_compile_simple,
    bench_compile_wide,
    bench_render,
    bench_select
);
criterion_main!(hot_paths);
