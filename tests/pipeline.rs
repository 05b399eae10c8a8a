use std::io::Write;
use std::sync::Arc;

use rating_tf_idf_vectorizer::{
    classifier::evaluate,
    dataset::{check_text_len, load_csv, train_test_split},
    ClassifierConfig, DefaultTFIDFEngine, Error, LinearSgdClassifier, ModelData, PunctuationTable,
    RatingClassifier, TFIDFVectorizer, VectorizerConfig,
};

const CSV: &str = "\
Rating,Text
5,\"Loved the tacos, loved the salsa! Friendly staff.\"
5,Best burrito in town &amp; fresh salsa
5,\"Friendly people, fresh tacos, great prices\"
1,\"Cold tacos, rude waiter, never again\"
1,Awful service @manager and stale chips
1,\"Rude staff, cold food, never again\"
3,\"Tacos were okay, prices a bit high\"
3,Decent burrito but slow service
";

fn write_csv(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("reviews.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(CSV.as_bytes()).unwrap();
    path
}

#[test]
fn fit_save_load_predict() {
    let dir = tempfile::tempdir().unwrap();
    let reviews = load_csv(write_csv(&dir)).unwrap();
    assert_eq!(reviews.len(), 8);

    let (train, test) = train_test_split(reviews, 0.25, 33).unwrap();
    assert_eq!((train.len(), test.len()), (6, 2));

    let table = Arc::new(PunctuationTable::build());
    let config = VectorizerConfig {
        ngram: 2,
        lemmatize: true,
        stop_word_count: 2,
        max_features: None,
    };
    let vectorizer: TFIDFVectorizer = TFIDFVectorizer::with_table(table.clone(), config).unwrap();
    let texts: Vec<&str> = train.iter().map(|r| r.text.as_str()).collect();
    let labels: Vec<u8> = train.iter().map(|r| r.rating).collect();
    let (model, x) = vectorizer.fit(&texts).unwrap();
    assert_eq!(x.n_rows(), 6);
    assert_eq!(model.stop_words().len(), 2);
    assert!(model.vocabulary().all(|gram| !gram.contains("manager") && !gram.contains("amp")));

    let mut classifier = LinearSgdClassifier::new(ClassifierConfig::default()).unwrap();
    classifier.fit(&x, &labels).unwrap();
    let test_texts: Vec<&str> = test.iter().map(|r| r.text.as_str()).collect();
    let test_labels: Vec<u8> = test.iter().map(|r| r.rating).collect();
    let evaluation = evaluate(&classifier, &model.transform(vectorizer.tokenizer(), &test_texts), &test_labels).unwrap();
    assert!((0.0..=1.0).contains(&evaluation.accuracy));

    let model = model.with_alpha(classifier.config().alpha);
    let path = dir.path().join("model.cbor");
    ModelData::from_model(&model, Some(classifier.clone())).save(&path).unwrap();

    let (loaded, loaded_classifier) = ModelData::load(&path).unwrap().into_model::<DefaultTFIDFEngine>().unwrap();
    let loaded_classifier = loaded_classifier.unwrap();
    assert_eq!(loaded, model);
    assert_eq!(loaded_classifier, classifier);
    assert_eq!(loaded.combination().alpha, Some(1e-4));
    assert!(loaded.combination().lemmatize);

    let tokenizer = loaded.tokenizer(table);
    let review = "The tacos were fresh and the salsa was great, friendly staff too!";
    check_text_len(review).unwrap();
    let vector = loaded.project(&tokenizer, review);
    assert_eq!(vector.len(), loaded.vocab_len());
    assert_eq!(vector, model.project(vectorizer.tokenizer(), review));
    assert_eq!(
        loaded_classifier.predict(&vector).unwrap(),
        classifier.predict(&vector).unwrap()
    );
}

#[test]
fn classifier_dimension_is_checked_on_load() {
    let table = Arc::new(PunctuationTable::build());
    let config = VectorizerConfig {
        stop_word_count: 0,
        ..VectorizerConfig::default()
    };
    let vectorizer: TFIDFVectorizer = TFIDFVectorizer::with_table(table, config).unwrap();
    let (model, x) = vectorizer.fit(&["good tacos here", "bad tacos there"]).unwrap();
    assert!(model.vocab_len() > 1);
    let mut classifier = LinearSgdClassifier::new(ClassifierConfig::default()).unwrap();
    classifier.fit(&x, &[5, 1]).unwrap();

    let mut data = ModelData::from_model(&model, Some(classifier));
    data.vocabulary.pop();
    data.idf.pop();
    assert!(matches!(data.into_model::<DefaultTFIDFEngine>(), Err(Error::MalformedModel(_))));
}

#[test]
fn short_reviews_are_refused() {
    assert!(matches!(check_text_len("Great tacos!"), Err(Error::TextTooShort { len: 12, .. })));
}
