use std::sync::Arc;

use rating_tf_idf_vectorizer::{
    classifier::evaluate, LinearSgdClassifier, ClassifierConfig, PunctuationTable, RatingClassifier,
    TFIDFVectorizer, VectorizerConfig,
};

fn main() -> rating_tf_idf_vectorizer::Result<()> {
    let reviews = [
        (5, "Loved the tacos, loved the salsa! Friendly staff and quick service."),
        (5, "Best burrito in town, fresh salsa and friendly people."),
        (1, "Cold tacos, rude waiter, never coming back."),
        (1, "Awful service and stale chips. Never again!"),
        (3, "Tacos were okay, prices a bit high for what you get."),
        (3, "Decent burrito, slow service, okay salsa."),
    ];
    let texts: Vec<&str> = reviews.iter().map(|(_, text)| *text).collect();
    let labels: Vec<u8> = reviews.iter().map(|(rating, _)| *rating).collect();

    // one table for every tokenizer
    let table = Arc::new(PunctuationTable::build());
    let config = VectorizerConfig {
        ngram: 2,
        stop_word_count: 3,
        ..Default::default()
    };
    let vectorizer: TFIDFVectorizer = TFIDFVectorizer::with_table(table, config)?;
    let (model, x) = vectorizer.fit(&texts)?;
    println!("vocabulary: {} n-grams", model.vocab_len());
    println!("stop words: {:?}", model.stop_words().iter().collect::<Vec<_>>());

    let mut classifier = LinearSgdClassifier::new(ClassifierConfig::default())?;
    classifier.fit(&x, &labels)?;
    println!("{:?}", evaluate(&classifier, &x, &labels)?);

    let query = "The salsa was fresh and the staff were friendly, will be back!";
    let vector = model.project(vectorizer.tokenizer(), query);
    println!("{vector:#?}");
    println!("predicted rating: {}", classifier.predict(&vector)?);
    Ok(())
}
