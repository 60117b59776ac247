/// Data sources a pipeline can read from.
pub const SOURCES: &[&str] = &["orders.csv", "warehouse (postgres)", "events (kafka)"];

/// Form state of the "new pipeline" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineDraft {
    pub name: String,
    pub source: Option<String>,
}

/// A pipeline shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub name: String,
    pub source: String,
}

impl PipelineDraft {
    /// Validates the draft. Errors are user-facing.
    pub fn build(&self, existing: &[Pipeline]) -> Result<Pipeline, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        if existing.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
            return Err(format!("Pipeline '{}' already exists", name));
        }
        let source = self
            .source
            .clone()
            .ok_or_else(|| "Pick a source".to_string())?;
        Ok(Pipeline {
            name: name.to_string(),
            source,
        })
    }
}
