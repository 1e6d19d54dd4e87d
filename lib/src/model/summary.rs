use serde::Serialize;

/// One row of a [`ModelSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSummary {
    pub name: String,
    pub layer_type: String,
    /// `None` stands for the batch dimension.
    pub output_shape: Vec<Option<usize>>,
    pub params: usize,
}

/// Layer-by-layer description of a model, shaped for display by a sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub layers: Vec<LayerSummary>,
    pub total_params: usize,
    pub trainable_params: usize,
}

impl ModelSummary {
    pub fn new(layers: Vec<LayerSummary>) -> Self {
        let total_params = layers.iter().map(|l| l.params).sum();
        Self {
            layers,
            total_params,
            trainable_params: total_params,
        }
    }
}

impl std::fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<24}{:<16}{:>8}", "Layer (type)", "Output shape", "Param #")?;
        for layer in &self.layers {
            let shape: Vec<String> = layer
                .output_shape
                .iter()
                .map(|d| d.map_or_else(|| "None".to_string(), |d| d.to_string()))
                .collect();
            writeln!(
                f,
                "{:<24}{:<16}{:>8}",
                format!("{} ({})", layer.name, layer.layer_type),
                format!("[{}]", shape.join(",")),
                layer.params
            )?;
        }
        write!(f, "Total params: {}", self.total_params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_totals_and_json_shape() {
        let summary = ModelSummary::new(vec![
            LayerSummary {
                name: "dense_1".into(),
                layer_type: "Dense".into(),
                output_shape: vec![None, Some(1)],
                params: 2,
            },
            LayerSummary {
                name: "dense_2".into(),
                layer_type: "Dense".into(),
                output_shape: vec![None, Some(1)],
                params: 2,
            },
        ]);
        assert_eq!(summary.total_params, 4);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalParams"], 4);
        assert_eq!(json["layers"][0]["outputShape"], serde_json::json!([null, 1]));
        assert_eq!(json["layers"][1]["layerType"], "Dense");

        let text = summary.to_string();
        assert!(text.contains("dense_1 (Dense)"));
        assert!(text.contains("[None,1]"));
        assert!(text.ends_with("Total params: 4"));
    }
}
