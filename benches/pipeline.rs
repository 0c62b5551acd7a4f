//! Benchmarks for the XForm transformation pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use odk_transformer::dom::Document;
use odk_transformer::markdown::to_html;
use odk_transformer::{Survey, Transformer, escape_url_path, parse_language};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{FixtureEngine, SURVEY, stylesheets};

// ============================================================================
// Pipeline Benchmarks
// ============================================================================

fn bench_transform(c: &mut Criterion) {
    let transformer = Transformer::new(FixtureEngine::default(), stylesheets());

    c.bench_function("transform", |b| {
        b.iter(|| {
            let survey = Survey::new(SURVEY)
                .with_media("happy face.jpg", "/media/happy.jpg")
                .with_theme("grid");
            transformer.transform(survey).unwrap()
        });
    });
}

fn bench_parse_xform(c: &mut Criterion) {
    c.bench_function("parse_xform", |b| {
        b.iter(|| Document::parse_xml(SURVEY).unwrap());
    });
}

// ============================================================================
// Component Benchmarks
// ============================================================================

fn bench_markdown(c: &mut Criterion) {
    let label = "# Title\n**strong** and _em_ with [a link](http://example.org)\n* one\n* two\n\n1. first\n2. second";

    c.bench_function("markdown", |b| {
        b.iter(|| to_html(label));
    });
}

fn bench_languages(c: &mut Criterion) {
    let labels = ["dutch", "English (en)", "fr-CA", "Sorani", "Swahili", "Persian"];

    c.bench_function("parse_language", |b| {
        b.iter(|| {
            for label in labels {
                parse_language(label, "nothing");
            }
        });
    });
}

fn bench_escape_url(c: &mut Criterion) {
    c.bench_function("escape_url_path", |b| {
        b.iter(|| escape_url_path("jr://images/some dir/../happy face ünïcödé.jpg?x=1#top"));
    });
}

criterion_group!(
    benches,
    bench_transform,
    bench_parse_xform,
    bench_markdown,
    bench_languages,
    bench_escape_url,
);
criterion_main!(benches);
