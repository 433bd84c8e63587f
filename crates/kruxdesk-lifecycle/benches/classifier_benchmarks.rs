//! Benchmark for keyword intent classification.
//!
//! The classifier runs on every customer message before any store mutation,
//! so its cost bounds the per-message overhead of the lifecycle controller.
//! Measures both short closing replies and longer mixed-content messages.

use criterion::{criterion_group, criterion_main, Criterion};
use kruxdesk_lifecycle::classify;

/// Generate a realistic customer message (~60 words) with no intent keywords
/// near the front, forcing a full table scan.
fn generate_neutral_message(index: usize) -> String {
    format!(
        "I submitted my business paperwork through the branch in Pune last \
         Tuesday and I was told the verification team would reach out within \
         two working days. Since then I have not received any update by email \
         or SMS about the next steps, and my registered mobile number has not \
         changed. Could you check what is happening with request number {}?",
        index
    )
}

fn generate_closing_message(index: usize) -> String {
    match index % 4 {
        0 => "thanks, that's all".to_string(),
        1 => "ok great, got it".to_string(),
        2 => "no more questions".to_string(),
        _ => "perfect, all set".to_string(),
    }
}

fn bench_classify_neutral(c: &mut Criterion) {
    let messages: Vec<String> = (0..64).map(generate_neutral_message).collect();
    let mut i = 0;
    c.bench_function("classify_neutral_message", |b| {
        b.iter(|| {
            let msg = &messages[i % messages.len()];
            i += 1;
            std::hint::black_box(classify(msg))
        })
    });
}

fn bench_classify_closing(c: &mut Criterion) {
    let messages: Vec<String> = (0..64).map(generate_closing_message).collect();
    let mut i = 0;
    c.bench_function("classify_closing_message", |b| {
        b.iter(|| {
            let msg = &messages[i % messages.len()];
            i += 1;
            std::hint::black_box(classify(msg))
        })
    });
}

criterion_group!(benches, bench_classify_neutral, bench_classify_closing);
criterion_main!(benches);
