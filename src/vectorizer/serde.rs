use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classifier::LinearSgdClassifier;
use crate::config::Combination;
use crate::error::{Error, Result};
use crate::utils::OrderedMap;
use crate::vectorizer::{stop_words::StopWords, tfidf::TFIDFEngine, FittedVectorizerModel};

/// File encoding of a [`ModelData`] bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Cbor,
}

impl Format {
    /// `.cbor` is CBOR, anything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("cbor") => Format::Cbor,
            _ => Format::Json,
        }
    }
}

/// Persisted form of a fitted model, optionally with its classifier.
///
/// Plain data without invariants; `into_model` checks everything before
/// anything is usable. Convert back with [`ModelData::from_model`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    /// n-grams in column order
    pub vocabulary: Vec<String>,
    /// `(n-gram, idf)` pairs; kept as a list so duplicates are seen on load
    pub idf: Vec<(String, f64)>,
    pub stop_words: StopWords,
    pub combination: Combination,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<LinearSgdClassifier>,
}

impl ModelData {
    pub fn from_model<E>(model: &FittedVectorizerModel<E>, classifier: Option<LinearSgdClassifier>) -> Self
    where
        E: TFIDFEngine,
    {
        Self {
            vocabulary: model.vocabulary().map(String::from).collect(),
            idf: model.idf_map().iter().map(|(gram, &idf)| (gram.clone(), idf)).collect(),
            stop_words: model.stop_words().clone(),
            combination: *model.combination(),
            classifier,
        }
    }

    /// Validate and split into the vectorizer model and the classifier.
    pub fn into_model<E>(self) -> Result<(FittedVectorizerModel<E>, Option<LinearSgdClassifier>)>
    where
        E: TFIDFEngine,
    {
        let mut idf = OrderedMap::with_capacity_and_hasher(self.idf.len(), Default::default());
        for (gram, value) in self.idf {
            if idf.insert(gram, value).is_some() {
                return Err(Error::MalformedModel("duplicate idf entry".into()));
            }
        }
        let model = FittedVectorizerModel::from_parts(self.vocabulary, &idf, self.stop_words, self.combination)?;
        if let Some(classifier) = &self.classifier {
            classifier.validate(model.vocab_len())?;
        }
        Ok((model, self.classifier))
    }

    /// Write the bundle, encoding picked from the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        match Format::from_path(path) {
            Format::Cbor => serde_cbor::to_writer(&mut writer, self)?,
            Format::Json => serde_json::to_writer(&mut writer, self)?,
        }
        writer.flush()?;
        log::info!("saved model with {} n-grams to {}", self.vocabulary.len(), path.display());
        Ok(())
    }

    /// Read a bundle without validating it; see [`ModelData::into_model`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let data = match Format::from_path(path) {
            Format::Cbor => serde_cbor::from_reader(reader)?,
            Format::Json => serde_json::from_reader(reader)?,
        };
        log::debug!("loaded model bundle from {}", path.display());
        Ok(data)
    }
}
