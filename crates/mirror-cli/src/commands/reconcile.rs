//! `reconcile`: run the pipeline over an existing working tree.

use std::path::Path;

use colored::Colorize;
use mirror_core::{Pipeline, PipelineReport};
use mirror_meta::METADATA_FILE;

use crate::error::{CliError, Result};

pub fn run_reconcile(dir: &Path, converge: bool) -> Result<PipelineReport> {
    if !dir.is_dir() {
        return Err(CliError::user(format!("{} is not a directory", dir.display())));
    }
    if !dir.join(METADATA_FILE).is_file() {
        println!(
            "{} no {} in {}, metadata-driven passes will be skipped",
            "warning:".yellow().bold(),
            METADATA_FILE,
            dir.display()
        );
    }

    let pipeline = if converge {
        Pipeline::converge(mirror_core::pipeline::DEFAULT_MAX_ROUNDS)
    } else {
        Pipeline::fixed()
    };
    let report = pipeline.run(dir);

    for pass in &report.passes {
        if pass.actions.is_empty() && pass.warnings.is_empty() {
            continue;
        }
        println!("{} {}", format!("[{:>2}]", pass.step).dimmed(), pass.pass.name().cyan());
        for action in &pass.actions {
            println!("  {action}");
        }
        for warning in &pass.warnings {
            println!("  {} {warning}", "!".yellow());
        }
    }

    let summary = format!(
        "{} actions, {} warnings in {} round(s)",
        report.action_count(),
        report.warning_count(),
        report.rounds
    );
    if report.converged {
        println!("{} {summary}", "done".green().bold());
    } else {
        println!("{} {summary}, still changing", "stopped".yellow().bold());
    }
    Ok(report)
}
