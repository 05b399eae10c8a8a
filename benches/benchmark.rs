use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rating_tf_idf_vectorizer::{PunctuationTable, TFIDFVectorizer, VectorizerConfig};

const WORDS: [&str; 24] = [
    "tacos", "salsa", "great", "awful", "service", "friendly", "rude", "cold", "hot",
    "fresh", "stale", "loved", "hated", "waiter", "prices", "cheap", "slow", "quick",
    "don't", "again", "never", "always", "burrito", "margarita",
];

// synthetic reviews with punctuation, entities and links mixed in
fn synthetic_reviews(n: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| {
            let len = rng.gen_range(20..120);
            let mut words: Vec<String> = Vec::with_capacity(len);
            for _ in 0..len {
                let word = WORDS.choose(&mut rng).copied().unwrap_or("tacos");
                let word = match rng.gen_range(0..20) {
                    0 => format!("{word}!"),
                    1 => format!("&quot;{word}&quot;"),
                    2 => "http://example.com".to_string(),
                    3 => format!("{word}/{word}"),
                    _ => word.to_string(),
                };
                words.push(word);
            }
            words.join(" ")
        })
        .collect()
}

fn vectorize_benchmark(c: &mut Criterion) {
    let reviews = synthetic_reviews(2_000);
    let table = Arc::new(PunctuationTable::build());

    c.bench_function("punctuation_table", |b| b.iter(PunctuationTable::build));

    let vectorizer: TFIDFVectorizer =
        TFIDFVectorizer::with_table(table.clone(), VectorizerConfig::default()).expect("valid config");

    c.bench_function("tokenize", |b| {
        b.iter(|| {
            reviews
                .iter()
                .map(|text| vectorizer.tokenizer().tokenize(text).len())
                .sum::<usize>()
        })
    });

    c.bench_function("fit", |b| b.iter(|| vectorizer.fit(&reviews).expect("non-empty corpus")));

    let (model, _) = vectorizer.fit(&reviews).expect("non-empty corpus");
    c.bench_function("project", |b| {
        b.iter(|| {
            for text in reviews.iter().take(200) {
                model.project(vectorizer.tokenizer(), text);
            }
        })
    });
}

criterion_group!(benches, vectorize_benchmark);
criterion_main!(benches);
