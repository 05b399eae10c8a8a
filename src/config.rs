use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tokenizer::TokenizerConfig;

/// How review text becomes features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// maximum n-gram length, at least 1
    pub ngram: usize,
    pub lemmatize: bool,
    /// number of corpus-derived stop words, 0 disables removal
    pub stop_word_count: usize,
    /// keep only the n-grams with the highest document frequency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_features: Option<usize>,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram: 2,
            lemmatize: false,
            stop_word_count: 10,
            max_features: None,
        }
    }
}

impl VectorizerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ngram == 0 {
            return Err(Error::InvalidConfig("ngram must be at least 1".into()));
        }
        if self.max_features == Some(0) {
            return Err(Error::InvalidConfig("max_features must be at least 1".into()));
        }
        Ok(())
    }

    pub fn tokenizer_config(&self) -> TokenizerConfig {
        TokenizerConfig { lemmatize: self.lemmatize }
    }
}

/// Linear SGD classifier hyperparameters (hinge loss, L2 penalty).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// regularization strength
    pub alpha: f64,
    pub epochs: usize,
    pub seed: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            alpha: 1e-4,
            epochs: 20,
            seed: 33,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(Error::InvalidConfig(format!("alpha must be positive, got {}", self.alpha)));
        }
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be at least 1".into()));
        }
        Ok(())
    }
}

/// Full training run configuration, loadable from a JSON file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub vectorizer: VectorizerConfig,
    pub classifier: ClassifierConfig,
    /// share of reviews held out for evaluation
    pub test_fraction: f64,
    /// train/test split seed
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vectorizer: VectorizerConfig::default(),
            classifier: ClassifierConfig::default(),
            test_fraction: 0.2,
            seed: 33,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.vectorizer.validate()?;
        self.classifier.validate()?;
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(Error::InvalidConfig(format!("test_fraction must be in (0, 1), got {}", self.test_fraction)));
        }
        Ok(())
    }

    pub fn combination(&self) -> Combination {
        Combination::new(&self.vectorizer, Some(self.classifier.alpha))
    }
}

/// The configuration a persisted model was built with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub ngram: usize,
    pub lemmatize: bool,
    /// number of stop words removed
    pub stop_words: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_features: Option<usize>,
    /// classifier regularization strength
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

impl Combination {
    pub fn new(vectorizer: &VectorizerConfig, alpha: Option<f64>) -> Self {
        Self {
            ngram: vectorizer.ngram,
            lemmatize: vectorizer.lemmatize,
            stop_words: vectorizer.stop_word_count,
            max_features: vectorizer.max_features,
            alpha,
        }
    }

    pub fn tokenizer_config(&self) -> TokenizerConfig {
        TokenizerConfig { lemmatize: self.lemmatize }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"vectorizer": {"ngram": 3}, "seed": 7}"#).unwrap();
        assert_eq!(config.vectorizer.ngram, 3);
        assert_eq!(config.vectorizer.stop_word_count, 10);
        assert_eq!(config.classifier, ClassifierConfig::default());
        assert_eq!(config.seed, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = PipelineConfig::default();
        config.vectorizer.ngram = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = PipelineConfig::default();
        config.test_fraction = 1.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.classifier.alpha = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn combination_mirrors_config() {
        let config = PipelineConfig::default();
        let combination = config.combination();
        assert_eq!(combination.ngram, 2);
        assert_eq!(combination.stop_words, 10);
        assert_eq!(combination.alpha, Some(1e-4));
        let json = serde_json::to_string(&combination).unwrap();
        assert_eq!(json, r#"{"ngram":2,"lemmatize":false,"stop_words":10,"alpha":0.0001}"#);
    }
}
