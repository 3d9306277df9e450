use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gcodeview_settings::{LodSettings, ParserSettings};
use gcodeview_visualizer::{parse_document, simplify_segments};
use std::hint::black_box;

/// Generate a contour program: plunge, linear zig-zag and arc fillets per pass
fn generate_program(passes: usize) -> String {
    let mut content = String::from("G21 G90 G17\nG0 Z5\nG0 X0 Y0\n");
    for pass in 0..passes {
        let y = pass as f32 * 2.0;
        content.push_str(&format!("G0 X0 Y{y:.3}\nG1 Z-1 F300\n"));
        for step in 1..=20 {
            content.push_str(&format!("G1 X{:.3} Y{:.3} F1200\n", step as f32 * 2.5, y));
        }
        content.push_str(&format!(
            "G2 X50 Y{:.3} I0 J0.5 ; fillet\nG3 X51 Y{:.3} R0.5\nG0 Z5\n",
            y + 1.0,
            y + 1.5
        ));
    }
    content
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_document");
    let settings = ParserSettings::default();

    for passes in [10, 100, 1000] {
        let program = generate_program(passes);
        group.throughput(Throughput::Bytes(program.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(passes), &program, |b, program| {
            b.iter(|| parse_document(black_box(program), &settings))
        });
    }
    group.finish();
}

fn bench_simplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplify_segments");
    let document = parse_document(&generate_program(1000), &ParserSettings::default());
    let settings = LodSettings::default();

    for budget in [50_000, 5_000, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(budget), &budget, |b, &budget| {
            b.iter(|| simplify_segments(black_box(&document.segments), budget, &settings))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_simplify);
criterion_main!(benches);
