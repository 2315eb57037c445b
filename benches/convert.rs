use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use svg2dxf::convert_document;

fn dense_svg_source(groups: usize, shapes_per_group: usize) -> String {
    let mut out = String::from("<svg xmlns=\"http://www.w3.org/2000/svg\">\n");
    for g in 0..groups {
        out.push_str(&format!("<g transform=\"translate({},{}) rotate(5)\">\n", g * 10, g * 5));
        for s in 0..shapes_per_group {
            let x = s * 12;
            out.push_str(&format!("<rect x=\"{x}\" y=\"0\" width=\"10\" height=\"6\"/>\n"));
            out.push_str(&format!("<circle cx=\"{x}\" cy=\"20\" r=\"4\"/>\n"));
            out.push_str(&format!(
                "<path d=\"M {x} 40 C {} 30 {} 30 {} 40 A 8 8 0 0 1 {} 48\"/>\n",
                x + 3,
                x + 7,
                x + 10,
                x + 18
            ));
        }
        out.push_str("</g>\n");
    }
    out.push_str("</svg>\n");
    out
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    for (groups, shapes) in [(4, 8), (16, 16), (64, 32)] {
        let source = dense_svg_source(groups, shapes);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{groups}x{shapes}")),
            &source,
            |b, source| {
                b.iter(|| {
                    let document = convert_document(black_box(source), None, None).unwrap();
                    black_box(document.entity_count())
                });
            },
        );
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let source = dense_svg_source(16, 16);
    let document = convert_document(&source, None, None).unwrap();
    c.bench_function("serialize_16x16", |b| {
        b.iter(|| {
            let mut bytes = Vec::new();
            document.serialize(black_box(&mut bytes)).unwrap();
            black_box(bytes.len())
        });
    });
}

criterion_group!(benches, bench_convert, bench_serialize);
criterion_main!(benches);
