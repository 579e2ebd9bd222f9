//! Structured tool descriptions.
//!
//! `ToolSpec` turns a handful of labelled fields (purpose, when to use, when
//! not to use, examples, output format) into the single description string an
//! agent runtime shows its model, and packages it with the parameter schema
//! as a [`ToolDef`].

use crate::ToolDef;

/// A structured tool specification.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Tool name (must be unique within a ToolSet).
    pub name: String,
    /// One-sentence imperative purpose: "Run a fast nmap port scan".
    pub purpose: String,
    /// When this tool should be used.
    pub when_to_use: String,
    /// When this tool should NOT be used.
    pub when_not_to_use: String,
    /// JSON Schema for the arguments object.
    pub parameters: serde_json::Value,
    /// Usage examples as (call, expected behavior) pairs.
    pub examples: Vec<UsageExample>,
    /// Description of the output.
    pub output_format: String,
    /// Situations where this tool is confused with another one.
    pub disambiguation: Vec<DisambiguationExample>,
}

/// Points the model at the right tool for a commonly confused scenario.
#[derive(Debug, Clone)]
pub struct DisambiguationExample {
    pub scenario: String,
    pub correct_tool: String,
    pub reason: String,
}

/// A usage example for a tool.
#[derive(Debug, Clone)]
pub struct UsageExample {
    pub input: String,
    pub output: String,
}

impl ToolSpec {
    pub fn builder(name: impl Into<String>) -> ToolSpecBuilder {
        ToolSpecBuilder {
            name: name.into(),
            purpose: None,
            when_to_use: None,
            when_not_to_use: None,
            parameters: None,
            examples: Vec::new(),
            output_format: None,
            disambiguation: Vec::new(),
        }
    }

    /// Render the structured fields as one description string.
    pub fn to_description(&self) -> String {
        let mut desc = format!("{}.", self.purpose);
        desc.push_str(&format!("\nWhen to use: {}", self.when_to_use));
        desc.push_str(&format!("\nWhen NOT to use: {}", self.when_not_to_use));

        if !self.examples.is_empty() {
            desc.push_str("\nExamples:");
            for ex in &self.examples {
                desc.push_str(&format!("\n  - {} -> {}", ex.input, ex.output));
            }
        }

        desc.push_str(&format!("\nOutput format: {}", self.output_format));

        if !self.disambiguation.is_empty() {
            desc.push_str("\nDisambiguation:");
            for d in &self.disambiguation {
                desc.push_str(&format!(
                    "\n  - {}: use '{}' instead, {}",
                    d.scenario, d.correct_tool, d.reason
                ));
            }
        }

        desc
    }

    pub fn to_tool_def(&self) -> ToolDef {
        ToolDef::new(
            self.name.clone(),
            self.to_description(),
            self.parameters.clone(),
        )
    }
}

/// Builder for [`ToolSpec`]. `build()` panics when a required field is
/// missing, which surfaces incomplete declarations at registration time.
pub struct ToolSpecBuilder {
    name: String,
    purpose: Option<String>,
    when_to_use: Option<String>,
    when_not_to_use: Option<String>,
    parameters: Option<serde_json::Value>,
    examples: Vec<UsageExample>,
    output_format: Option<String>,
    disambiguation: Vec<DisambiguationExample>,
}

impl ToolSpecBuilder {
    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    pub fn when_to_use(mut self, when: impl Into<String>) -> Self {
        self.when_to_use = Some(when.into());
        self
    }

    pub fn when_not_to_use(mut self, when_not: impl Into<String>) -> Self {
        self.when_not_to_use = Some(when_not.into());
        self
    }

    pub fn parameters(mut self, params: serde_json::Value) -> Self {
        self.parameters = Some(params);
        self
    }

    /// Derive the parameter schema from the tool's argument struct.
    pub fn parameters_for<T: schemars::JsonSchema>(self) -> Self {
        self.parameters(crate::json_schema_for::<T>())
    }

    pub fn example(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.examples.push(UsageExample {
            input: input.into(),
            output: output.into(),
        });
        self
    }

    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    pub fn disambiguate(
        mut self,
        scenario: impl Into<String>,
        correct_tool: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.disambiguation.push(DisambiguationExample {
            scenario: scenario.into(),
            correct_tool: correct_tool.into(),
            reason: reason.into(),
        });
        self
    }

    /// Shortcut for `.build().to_tool_def()`.
    pub fn to_tool_def(self) -> ToolDef {
        self.build().to_tool_def()
    }

    pub fn build(self) -> ToolSpec {
        ToolSpec {
            name: self.name,
            purpose: self.purpose.expect("ToolSpec requires 'purpose'"),
            when_to_use: self.when_to_use.expect("ToolSpec requires 'when_to_use'"),
            when_not_to_use: self
                .when_not_to_use
                .expect("ToolSpec requires 'when_not_to_use'"),
            parameters: self.parameters.expect("ToolSpec requires 'parameters'"),
            examples: self.examples,
            output_format: self
                .output_format
                .unwrap_or_else(|| "JSON object with status and output or message".into()),
            disambiguation: self.disambiguation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_spec() -> ToolSpecBuilder {
        ToolSpec::builder("nmap_scan")
            .purpose("Run a fast port scan against a host")
            .when_to_use("When you need to know which common ports are open")
            .when_not_to_use("When you want to exploit a service, use metasploit_scan")
            .parameters(serde_json::json!({
                "type": "object",
                "properties": { "target": { "type": "string" } },
                "required": ["target"]
            }))
    }

    #[test]
    fn description_contains_every_section() {
        let spec = scan_spec()
            .example("nmap_scan(target='10.0.0.1')", "open ports on 10.0.0.1")
            .disambiguate(
                "Testing a URL parameter for injection",
                "sqlmap_scan",
                "nmap only inspects ports",
            )
            .build();

        let desc = spec.to_description();
        assert!(desc.starts_with("Run a fast port scan against a host."));
        assert!(desc.contains("When NOT to use:"));
        assert!(desc.contains("Examples:"));
        assert!(desc.contains("Disambiguation:"));
        assert!(desc.contains("'sqlmap_scan'"));
    }

    #[test]
    fn default_output_format_describes_result_shape() {
        let spec = scan_spec().build();
        assert!(spec.output_format.contains("status"));
    }

    #[test]
    fn to_tool_def_keeps_name_and_schema() {
        let def = scan_spec().to_tool_def();
        assert_eq!(def.function.name, "nmap_scan");
        assert_eq!(def.function.parameters["required"][0], "target");
    }

    #[test]
    #[should_panic(expected = "ToolSpec requires 'purpose'")]
    fn builder_panics_on_missing_purpose() {
        ToolSpec::builder("incomplete")
            .when_to_use("test")
            .when_not_to_use("test")
            .parameters(serde_json::json!({}))
            .build();
    }
}
