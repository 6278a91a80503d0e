use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::api::PromptzApp;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{PromptzError, Result};
use crate::model::Prompt;
use crate::store::KvBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Txt,
}

impl ExportFormat {
    fn default_filename(self) -> &'static str {
        match self {
            ExportFormat::Json => "backup.json",
            ExportFormat::Csv => "prompts.csv",
            ExportFormat::Txt => "prompts.txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Txt => write!(f, "txt"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = PromptzError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "txt" => Ok(ExportFormat::Txt),
            other => Err(PromptzError::Validation(format!(
                "Unknown export format \"{}\": expected json, csv or txt",
                other
            ))),
        }
    }
}

pub fn run<B: KvBackend>(
    app: &PromptzApp<B>,
    format: ExportFormat,
    out: Option<&Path>,
) -> Result<CmdResult> {
    let snapshot = app.repo.data();

    if snapshot.prompts.is_empty() {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info("Nothing to export."));
        return Ok(result);
    }

    let body = match format {
        ExportFormat::Json => snapshot.to_json_pretty()?,
        ExportFormat::Csv => render_csv(&snapshot.prompts),
        ExportFormat::Txt => render_txt(&snapshot.prompts),
    };

    let path: PathBuf = match out {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(format.default_filename()),
    };
    fs::write(&path, body).map_err(PromptzError::Io)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} prompts to {}",
        snapshot.prompts.len(),
        path.display()
    )));
    Ok(result)
}

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn render_csv(prompts: &[Prompt]) -> String {
    let mut lines = Vec::with_capacity(prompts.len() + 1);
    lines.push("ID,Title,Description,Content,Folder".to_string());
    for p in prompts {
        lines.push(format!(
            "{},{},{},{},{}",
            p.id,
            csv_quote(&p.title),
            csv_quote(&p.description),
            csv_quote(&p.content),
            csv_quote(&p.category)
        ));
    }
    lines.join("\n")
}

fn render_txt(prompts: &[Prompt]) -> String {
    prompts
        .iter()
        .map(|p| {
            format!(
                "[{}] {}\nDesc: {}\n---\n{}",
                p.category, p.title, p.description, p.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n================\n\n")
}
