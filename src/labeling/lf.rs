//! Defines `LabelingFunction` and its builder.
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{LfError, Result, WeakLabelError};
use crate::record::{FieldValue, Record};
use super::preprocess::Preprocessor;


/// The label value a labeling function emits to decline voting.
pub const ABSTAIN: i64 = 0;


/// Extra constant arguments passed to every invocation
/// of a labeling function body.
pub type Resources = BTreeMap<String, FieldValue>;

type LfBody = dyn Fn(&Record, &Resources)
    -> std::result::Result<i64, LfError> + Send + Sync;


/// A labeling function: a pure map from a data point to an integer
/// label, with `0` meaning abstain.
///
/// Labeling functions are immutable once built.
/// Construction goes through [`LfBuilder`](LfBuilder):
///
/// # Example
/// ```
/// use weaklabel::prelude::*;
///
/// let lf = LfBuilder::new("short_text")
///     .label_space(&[0, 1])
///     .schema(&["text"])
///     .build(|x, _| Ok(if x.text("text")?.len() < 20 { 1 } else { 0 }));
///
/// let x = Record::from_pairs([("text", "tiny")]);
/// assert_eq!(lf.label(&x).unwrap(), 1);
/// ```
#[derive(Clone)]
pub struct LabelingFunction {
    name: String,
    body: Arc<LfBody>,
    label_space: Option<Vec<i64>>,
    schema: Option<Vec<String>>,
    resources: Resources,
    preprocessors: Vec<Arc<dyn Preprocessor>>,
    fault_tolerant: bool,
}


impl LabelingFunction {
    /// Name of this labeling function.
    pub fn name(&self) -> &str {
        &self.name
    }


    /// The set of labels this function may emit, if declared.
    pub fn label_space(&self) -> Option<&[i64]> {
        self.label_space.as_deref()
    }


    /// The record fields this function reads, if declared.
    pub fn schema(&self) -> Option<&[String]> {
        self.schema.as_deref()
    }


    /// Whether body failures are mapped to abstain.
    pub fn fault_tolerant(&self) -> bool {
        self.fault_tolerant
    }


    /// Runs the preprocessor chain in order.
    /// A preprocessor returning `None` is fatal for the run.
    fn preprocess(&self, x: &Record) -> Result<Record> {
        let mut x = x.clone();
        for preprocessor in &self.preprocessors {
            x = preprocessor.preprocess(&x)
                .ok_or_else(|| WeakLabelError::Preprocessor {
                    preprocessor: preprocessor.name().to_string(),
                })?;
        }
        Ok(x)
    }


    /// A vote outside the declared label space is a body failure.
    fn checked(&self, label: i64) -> std::result::Result<i64, LfError> {
        match &self.label_space {
            Some(space) if !space.contains(&label) => {
                let msg = format!(
                    "emitted label {label} is outside the declared \
                     label space {space:?}"
                );
                Err(LfError::Custom(msg))
            },
            _ => Ok(label),
        }
    }


    /// Labels the given data point.
    ///
    /// Runs all preprocessors, then the body, then the label-space
    /// check. If the body fails (or votes outside the declared space)
    /// and the function is fault-tolerant, the failure becomes an
    /// abstain; otherwise it aborts the run.
    pub fn label(&self, x: &Record) -> Result<i64> {
        self.label_counted(x).map(|(label, _)| label)
    }


    /// Like [`label`](LabelingFunction::label),
    /// but reports whether a fault-tolerant body failure was recovered.
    /// Appliers use this to keep per-function diagnostic counts.
    pub(crate) fn label_counted(&self, x: &Record) -> Result<(i64, bool)> {
        let x = self.preprocess(x)?;
        let labeled = (self.body)(&x, &self.resources)
            .and_then(|label| self.checked(label));
        match labeled {
            Ok(label) => Ok((label, false)),
            Err(_) if self.fault_tolerant => Ok((ABSTAIN, true)),
            Err(source) => Err(WeakLabelError::LfExecution {
                lf: self.name.clone(), source,
            }),
        }
    }
}


impl fmt::Debug for LabelingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelingFunction")
            .field("name", &self.name)
            .field("label_space", &self.label_space)
            .field("schema", &self.schema)
            .field("fault_tolerant", &self.fault_tolerant)
            .finish_non_exhaustive()
    }
}


/// Builder for [`LabelingFunction`](LabelingFunction).
///
/// The builder plays the role of the decorator-style construction
/// in other weak supervision systems; both produce the same
/// immutable configuration.
pub struct LfBuilder {
    name: String,
    label_space: Option<Vec<i64>>,
    schema: Option<Vec<String>>,
    resources: Resources,
    preprocessors: Vec<Arc<dyn Preprocessor>>,
    fault_tolerant: bool,
}


impl LfBuilder {
    /// Starts a builder for a labeling function of the given name.
    pub fn new<S: ToString>(name: S) -> Self {
        Self {
            name: name.to_string(),
            label_space: None,
            schema: None,
            resources: Resources::new(),
            preprocessors: Vec::new(),
            fault_tolerant: false,
        }
    }


    /// Declares the set of labels the function may emit, including `0`.
    /// Enforced at execution time: a vote outside the declared space
    /// is treated like a body failure.
    pub fn label_space(mut self, labels: &[i64]) -> Self {
        self.label_space = Some(labels.to_vec());
        self
    }


    /// Declares the record fields the function reads.
    /// Advisory metadata for tooling; not enforced at execution time.
    pub fn schema(mut self, fields: &[&str]) -> Self {
        self.schema = Some(fields.iter().map(|s| s.to_string()).collect());
        self
    }


    /// Adds a constant resource passed to every body invocation.
    pub fn resource<S, V>(mut self, name: S, value: V) -> Self
        where S: ToString,
              V: Into<FieldValue>,
    {
        self.resources.insert(name.to_string(), value.into());
        self
    }


    /// Appends a preprocessor to the chain.
    /// Preprocessors run in the order they were added.
    pub fn preprocessor<P>(mut self, preprocessor: P) -> Self
        where P: Preprocessor + 'static,
    {
        self.preprocessors.push(Arc::new(preprocessor));
        self
    }


    /// Maps body failures to abstain instead of aborting the run.
    pub fn fault_tolerant(mut self) -> Self {
        self.fault_tolerant = true;
        self
    }


    /// Finishes the builder with the given body.
    pub fn build<F>(self, body: F) -> LabelingFunction
        where F: Fn(&Record, &Resources)
                -> std::result::Result<i64, LfError> + Send + Sync + 'static,
    {
        LabelingFunction {
            name: self.name,
            body: Arc::new(body),
            label_space: self.label_space,
            schema: self.schema,
            resources: self.resources,
            preprocessors: self.preprocessors,
            fault_tolerant: self.fault_tolerant,
        }
    }
}
