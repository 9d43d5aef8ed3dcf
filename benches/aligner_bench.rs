use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seams_gold::aligner::OverlapWindow;
use seams_gold::config::AlignmentConfig;
use seams_gold::{equivalent, similarity_ratio, TaggedSentence};

const PASSAGE: &str = "The coach rattled over the stones of the yard. Mr. Pickwick leaned out of the window \
and called to the driver, who did not hear him. \"We shall be late,\" said his companion, frowning at the \
clock above the inn door. Nobody answered; the horses stamped and steamed in the cold morning air.";

fn sentences() -> Vec<String> {
    PASSAGE.split_inclusive(". ").map(|s| s.trim().to_string()).collect()
}

fn bench_similarity_ratio(c: &mut Criterion) {
    // WHY: the ratio dominates comparison cost, so catch regressions on paragraph-sized inputs
    let altered = PASSAGE.replace("frowning", "scowling").replace("cold", "grey");

    let mut group = c.benchmark_group("aligner");
    group.bench_function("similarity_ratio_paragraph", |b| {
        b.iter(|| black_box(similarity_ratio(black_box(PASSAGE), black_box(&altered))))
    });

    let primary = sentences();
    let mut merged = primary.clone();
    let tail = merged.split_off(2).join(" ");
    merged.push(tail);
    group.bench_function("equivalent_same_counts", |b| {
        b.iter(|| black_box(equivalent(black_box(&primary), black_box(&primary), 0.9)))
    });
    group.bench_function("equivalent_mismatched_counts", |b| {
        b.iter(|| black_box(equivalent(black_box(&primary), black_box(&merged), 0.9)))
    });
    group.finish();
}

fn bench_overlap_window(c: &mut Criterion) {
    let config = AlignmentConfig::default();
    let primary = sentences();
    let candidates: Vec<TaggedSentence> = (0..200)
        .flat_map(|_| primary.iter())
        .enumerate()
        .map(|(idx, text)| TaggedSentence::new(idx.to_string(), text.clone(), None))
        .collect();

    c.bench_function("overlap_window_collect", |b| {
        b.iter(|| {
            let mut window = OverlapWindow::from_config(&config);
            black_box(window.collect(&candidates, &primary, PASSAGE, &config))
        })
    });
}

criterion_group!(benches, bench_similarity_ratio, bench_overlap_window);
criterion_main!(benches);
