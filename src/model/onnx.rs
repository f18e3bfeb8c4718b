//! ONNX Runtime binary classifier. Input: [1, dim] f32; output: class probabilities.
//! Reads the `probabilities` output when the graph has one, else the last output, and takes
//! column 1 (the anomalous class) when two columns are present.

use super::{check_probability, Classifier};
use crate::error::ClassifierError;
use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

const PROBABILITY_OUTPUT: &str = "probabilities";

pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let load_err = |reason: String| ClassifierError::Load {
            path: path.display().to_string(),
            reason,
        };
        if !path.exists() {
            return Err(load_err("file not found".into()));
        }

        let session = Session::builder()
            .map_err(|e| load_err(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_err(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e| load_err(e.to_string()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input".to_string());
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == PROBABILITY_OUTPUT)
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| load_err("model has no outputs".into()))?;

        tracing::info!(
            path = %path.display(),
            input = %input_name,
            output = %output_name,
            "loaded ONNX classifier"
        );
        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        let infer_err = |e: ort::Error| ClassifierError::Inference(e.to_string());

        let values: Vec<f32> = features.iter().map(|&x| x as f32).collect();
        let arr = Array2::from_shape_vec((1, values.len()), values)
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;
        let input = Tensor::from_array(arr).map_err(infer_err)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifierError::Inference("session lock poisoned".into()))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(infer_err)?;
        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            ClassifierError::Inference(format!("missing output {}", self.output_name))
        })?;
        let (_, data) = output.try_extract_tensor::<f32>().map_err(infer_err)?;

        let p = match data {
            [_, positive, ..] => *positive,
            [only] => *only,
            [] => return Err(ClassifierError::Inference("empty output tensor".into())),
        };
        check_probability(p as f64)
    }
}
