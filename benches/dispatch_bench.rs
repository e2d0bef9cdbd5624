use course_finder::openai::call::decode_arguments;
use course_finder::openai::{search_courses_schema, FunctionCallDirective};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn criterion_benchmark(c: &mut Criterion) {
    let schema = search_courses_schema();
    let directive = FunctionCallDirective {
        name: "search_courses".into(),
        arguments: r#"{"role":"student","product":"Azure","level":"beginner"}"#.into(),
    };
    c.bench_function("decode search_courses arguments", |b| {
        b.iter(|| decode_arguments(black_box(&directive), black_box(&schema)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
