//! Tool subcommand: list the calculator tools and show one definition.
//!
//! Reads specs straight from [`ToolRegistry::arithmetic`], the same registry the `calc`
//! agent binds, so the output matches what the model is offered.

use serde::Serialize;
use toolloop::{ToolRegistry, ToolSpec};

use crate::run::{truncate_display, RunError};

/// Maximum length for description in the list table.
const LIST_DESC_MAX_LEN: usize = 60;

/// Output format for `tool show`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ToolShowFormat {
    #[default]
    Yaml,
    Json,
}

/// Renders the NAME / DESCRIPTION table.
pub fn format_tool_table(tools: &[ToolSpec]) -> String {
    let name_width = tools.iter().map(|t| t.name.len()).max().unwrap_or(4).max(4);
    let mut lines = vec![format!("{:<width$}\t{}", "NAME", "DESCRIPTION", width = name_width)];
    for spec in tools {
        let desc = spec
            .description
            .as_deref()
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("");
        lines.push(format!(
            "{:<width$}\t{}",
            spec.name,
            truncate_display(desc, LIST_DESC_MAX_LEN),
            width = name_width
        ));
    }
    lines.join("\n")
}

pub fn list_tools() -> Result<(), RunError> {
    println!("{}", format_tool_table(&ToolRegistry::arithmetic().list()));
    Ok(())
}

#[derive(Serialize)]
struct ToolSpecOutput<'a> {
    name: &'a str,
    description: Option<&'a str>,
    input_schema: &'a serde_json::Value,
}

/// Serializes one spec as YAML or JSON.
pub fn render_tool(spec: &ToolSpec, format: ToolShowFormat) -> Result<String, RunError> {
    let out = ToolSpecOutput {
        name: &spec.name,
        description: spec.description.as_deref(),
        input_schema: &spec.input_schema,
    };
    match format {
        ToolShowFormat::Yaml => {
            serde_yaml::to_string(&out).map_err(|e| RunError::Output(e.to_string()))
        }
        ToolShowFormat::Json => {
            serde_json::to_string_pretty(&out).map_err(|e| RunError::Output(e.to_string()))
        }
    }
}

/// Prints the full definition of `name`; unknown names are [`RunError::ToolNotFound`].
pub fn show_tool(name: &str, format: ToolShowFormat) -> Result<(), RunError> {
    let registry = ToolRegistry::arithmetic();
    let tool = registry
        .get(name)
        .ok_or_else(|| RunError::ToolNotFound(name.to_string()))?;
    println!("{}", render_tool(&tool.spec(), format)?);
    Ok(())
}
