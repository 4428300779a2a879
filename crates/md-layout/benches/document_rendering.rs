//! Benchmarks for rendering parsed documents into fragment trees.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use md_layout::{BlockRenderer, BulletGlyphs, HeadingTiers, LayoutContext, TreeBackend};

/// Generate markdown with headings, nested lists, and a table per section.
fn generate_markdown(sections: usize) -> String {
    let mut md = String::with_capacity(sections * 400);
    md.push_str("# Document Title\n\n");

    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\n"));
        md.push_str("Paragraph with **bold**, *italic* and `code`.\n\n");
        md.push_str("- one\n  - two\n    - three\n- [x] done\n\n");
        md.push_str("> [!NOTE]\n> Quoted text.\n\n");
        md.push_str("| A | B |\n|---|---|\n| 1 | 2 |\n\n");
    }
    md
}

fn bench_render_sizes(c: &mut Criterion) {
    let bullets = BulletGlyphs::default();
    let headings = HeadingTiers::default();
    let renderer = BlockRenderer::new(&TreeBackend);

    let mut group = c.benchmark_group("render_document");
    for sections in [1, 10, 100] {
        let blocks = md_parse::parse(&generate_markdown(sections));
        group.throughput(Throughput::Elements(blocks.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &blocks, |b, blocks| {
            b.iter(|| renderer.render_document(blocks, LayoutContext::new(&bullets, &headings)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render_sizes);
criterion_main!(benches);
