//! Benchmarks for document finalization.

use blogflow::finalize::{finalize, SeoPack};
use blogflow::testing::{sample_stage_outputs, stub_reply};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn long_draft(sections: usize) -> String {
    let mut draft = String::from("# Remote Work Productivity\n\n[TOC]\n\nIntro.\n");
    for i in 0..sections {
        draft.push_str(&format!(
            "\n## Section {i}\n\nBody text for section {i}.   \n\n\n```rust\n# not a heading\nfn main() {{}}\n```\n"
        ));
    }
    draft
}

fn finalize_benchmark(c: &mut Criterion) {
    let outputs = sample_stage_outputs();
    let edited = &outputs[3].1;
    let seo = &outputs[4].1;

    c.bench_function("finalize_sample", |b| {
        b.iter(|| finalize(black_box(edited), black_box(seo)));
    });

    let draft = long_draft(200);
    c.bench_function("finalize_long_draft", |b| {
        b.iter(|| finalize(black_box(&draft), black_box(seo)));
    });

    let reply = stub_reply();
    c.bench_function("seo_pack_parse", |b| {
        b.iter(|| SeoPack::parse(black_box(&reply)));
    });
}

criterion_group!(benches, finalize_benchmark);
criterion_main!(benches);
