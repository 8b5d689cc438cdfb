use crate::catalog::Catalog;
use crate::decide::{self, Annotation, LineClass};
use anyhow::{Context, Result};
use minijinja::{context, Environment};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// The annotations found in one input, as reported by `annotate`.
/// `path` is `-` for stdin.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    pub annotations: Vec<Annotation>,
}

/// Annotate each file, or stdin when no files are given.
pub fn annotate_files(
    paths: &[PathBuf],
    percentage: u8,
    catalog: &Catalog,
) -> Result<Vec<FileReport>> {
    if paths.is_empty() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(vec![FileReport {
            path: "-".into(),
            annotations: decide::annotate_text(&text, percentage, catalog),
        }]);
    }

    paths
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(FileReport {
                path: path.display().to_string(),
                annotations: decide::annotate_text(&text, percentage, catalog),
            })
        })
        .collect()
}

/// Print one templated line per annotation. Line numbers are 1-based
/// here, matching compiler-style listings; columns stay 0-based
/// character offsets.
pub fn render_listing(
    reports: &[FileReport],
    template: &str,
    out: &mut impl Write,
) -> Result<()> {
    let env = Environment::new();
    let tmpl = env
        .template_from_str(template)
        .context("parsing listing template")?;
    for report in reports {
        for annotation in &report.annotations {
            let line = tmpl
                .render(context! {
                    path => report.path,
                    line => annotation.line + 1,
                    column => annotation.start_column,
                    end_column => annotation.end_column,
                    message => annotation.message,
                })
                .context("rendering listing template")?;
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

/// Print the annotation records as JSON, one report per input.
pub fn render_json(reports: &[FileReport], out: &mut impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(reports).context("serializing annotations")?;
    writeln!(out, "{json}")?;
    Ok(())
}

/// Show the filter decision and gate arithmetic for one line, as the
/// server would see it.
pub fn render_explain(
    raw: &str,
    percentage: u8,
    catalog: &Catalog,
    out: &mut impl Write,
) -> Result<()> {
    let code_start = match decide::classify_line(raw) {
        LineClass::Ineligible(reason) => {
            writeln!(out, "ineligible: {reason}")?;
            return Ok(());
        }
        LineClass::Eligible { code_start } => code_start,
    };

    let trimmed = raw.trim();
    let derivation = decide::derive(trimmed);
    let residue = derivation.gate_value % 100;
    writeln!(out, "eligible: code starts at column {code_start}")?;
    writeln!(out, "digest:   {}", hex::encode(derivation.digest))?;
    writeln!(
        out,
        "gate:     {} % 100 = {residue}, threshold {percentage}",
        derivation.gate_value
    )?;
    if residue < u32::from(percentage) {
        let index = derivation.message_value as usize % catalog.len();
        writeln!(
            out,
            "message:  {} % {} = {index}: {}",
            derivation.message_value,
            catalog.len(),
            catalog.get(index)
        )?;
    } else {
        writeln!(out, "message:  none, the gate stays closed")?;
    }
    Ok(())
}
