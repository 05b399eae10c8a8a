use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use rating_tf_idf_vectorizer::{
    classifier::evaluate,
    dataset::{check_text_len, load_csv, train_test_split, Review},
    DefaultTFIDFEngine, Error, FittedVectorizerModel, LinearSgdClassifier, ModelData, PipelineConfig,
    PunctuationTable, RatingClassifier, Result, TFIDFVectorizer,
};

#[derive(Parser)]
#[command(name = "rating-tf-idf-vectorizer")]
#[command(about = "Fit review TF-IDF models and predict star ratings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit vectorizer and classifier on a labelled CSV and save the model
    Fit(FitArgs),
    /// Print the projected TF-IDF vector of a text as JSON
    Project {
        #[arg(short, long)]
        model: PathBuf,
        #[arg(short, long)]
        text: String,
    },
    /// Predict the star rating of a review
    Predict {
        #[arg(short, long)]
        model: PathBuf,
        #[arg(short, long)]
        text: String,
    },
}

#[derive(Args)]
struct FitArgs {
    /// CSV with Rating and Text columns
    #[arg(short, long)]
    data: PathBuf,
    /// output model, .cbor for CBOR, JSON otherwise
    #[arg(short, long)]
    out: PathBuf,
    /// JSON pipeline config; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    ngram: Option<usize>,
    #[arg(long)]
    lemmatize: bool,
    #[arg(long)]
    stop_words: Option<usize>,
    #[arg(long)]
    max_features: Option<usize>,
    #[arg(long)]
    alpha: Option<f64>,
    #[arg(long)]
    epochs: Option<usize>,
    #[arg(long)]
    test_fraction: Option<f64>,
    #[arg(long)]
    seed: Option<u64>,
}

impl FitArgs {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(ngram) = self.ngram {
            config.vectorizer.ngram = ngram;
        }
        if self.lemmatize {
            config.vectorizer.lemmatize = true;
        }
        if let Some(k) = self.stop_words {
            config.vectorizer.stop_word_count = k;
        }
        if self.max_features.is_some() {
            config.vectorizer.max_features = self.max_features;
        }
        if let Some(alpha) = self.alpha {
            config.classifier.alpha = alpha;
        }
        if let Some(epochs) = self.epochs {
            config.classifier.epochs = epochs;
        }
        if let Some(fraction) = self.test_fraction {
            config.test_fraction = fraction;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
            config.classifier.seed = seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn split_labels(reviews: Vec<Review>) -> (Vec<String>, Vec<u8>) {
    reviews.into_iter().map(|review| (review.text, review.rating)).unzip()
}

fn fit(args: &FitArgs) -> Result<()> {
    let config = args.pipeline_config()?;
    log::debug!("pipeline config: {config:?}");
    let reviews = load_csv(&args.data)?;
    let (train, test) = train_test_split(reviews, config.test_fraction, config.seed)?;
    let (train_texts, train_labels) = split_labels(train);

    let vectorizer: TFIDFVectorizer = TFIDFVectorizer::new(config.vectorizer)?;
    let (model, x_train) = vectorizer.fit(&train_texts)?;

    let mut classifier = LinearSgdClassifier::new(config.classifier)?;
    classifier.fit(&x_train, &train_labels)?;

    if test.is_empty() {
        log::warn!("no held-out reviews, skipping evaluation");
    } else {
        let (test_texts, test_labels) = split_labels(test);
        let x_test = model.transform(vectorizer.tokenizer(), &test_texts);
        let evaluation = evaluate(&classifier, &x_test, &test_labels)?;
        println!("{}", serde_json::to_string(&evaluation)?);
    }

    let model = model.with_alpha(config.classifier.alpha);
    ModelData::from_model(&model, Some(classifier)).save(&args.out)
}

fn load(path: &Path) -> Result<(FittedVectorizerModel<DefaultTFIDFEngine>, Option<LinearSgdClassifier>)> {
    ModelData::load(path)?.into_model()
}

fn project(model_path: &Path, text: &str) -> Result<()> {
    let (model, _) = load(model_path)?;
    let tokenizer = model.tokenizer(Arc::new(PunctuationTable::build()));
    let vector = model.project(&tokenizer, text);
    println!("{}", serde_json::to_string(&vector)?);
    Ok(())
}

fn predict(model_path: &Path, text: &str) -> Result<()> {
    check_text_len(text)?;
    let (model, classifier) = load(model_path)?;
    let classifier = classifier.ok_or(Error::NotTrained)?;
    let tokenizer = model.tokenizer(Arc::new(PunctuationTable::build()));
    let rating = classifier.predict(&model.project(&tokenizer, text))?;
    println!("{rating}");
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Fit(args) => fit(args),
        Commands::Project { model, text } => project(model, text),
        Commands::Predict { model, text } => predict(model, text),
    };
    if let Err(err) = result {
        log::error!("{err}");
        std::process::exit(1);
    }
}
