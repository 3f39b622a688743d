//! Extraction benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use roos_parser::{parse_component, ClsxExtractor, ContentExtractor};

fn generate_component(num_children: usize) -> String {
    let mut source = String::from(
        r#"
import React from 'react';
import clsx from 'clsx';

export interface ICardProps {
  size?: 'sm' | 'md' | 'lg';
  active?: boolean;
  title?: string;
}

export const Card = ({ size = 'md', active, title, children }: ICardProps) => {
  return (
    <div className={clsx('rvo-card', `rvo-card--${size}`, active && 'rvo-card--active')}>
"#,
    );
    for i in 0..num_children {
        source.push_str(&format!(
            "      {{title && <h{level} className=\"rvo-card__title-{i}\">{{title}}</h{level}>}}\n",
            level = i % 6 + 1,
            i = i
        ));
    }
    source.push_str("      {children}\n    </div>\n  );\n};\n");
    source
}

fn bench_parse_component(c: &mut Criterion) {
    let source = generate_component(10);

    c.bench_function("parse_component_small", |b| {
        b.iter(|| parse_component(black_box(&source), None, None))
    });
}

fn bench_parse_large(c: &mut Criterion) {
    let source = generate_component(300);

    println!("Large component size: {} lines", source.lines().count());

    c.bench_function("parse_component_300_children", |b| {
        b.iter(|| parse_component(black_box(&source), None, None))
    });
}

fn bench_extract(c: &mut Criterion) {
    let source = generate_component(300);
    let model = parse_component(&source, None, None).unwrap();
    let root = model.root_element().unwrap();

    c.bench_function("extract_classes_and_content", |b| {
        b.iter(|| {
            let classes = ClsxExtractor::new(&model.attributes)
                .extract(black_box("clsx('rvo-card', `rvo-card--${size}`, active && 'rvo-card--active')"));
            let content = ContentExtractor::new().extract(black_box(&root), &model.preamble);
            (classes, content)
        })
    });
}

criterion_group!(benches, bench_parse_component, bench_parse_large, bench_extract);
criterion_main!(benches);
