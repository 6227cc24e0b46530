use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod case;
mod provenance;

use case::{gen_case, run_case, write_matrix_csv, RemapCase};
use provenance::{current_git_rev, write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Conservative field remapping between 2D meshes")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Remap a case file; writes the result JSON and matrix.csv next to it
    Run {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Write a perturbed-grid remap case
    Gen {
        #[arg(long, default_value_t = 4)]
        nx: usize,
        #[arg(long, default_value_t = 4)]
        ny: usize,
        #[arg(long, default_value_t = 0.2)]
        jitter: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run { input, out } => run(&input, &out),
        Action::Gen {
            nx,
            ny,
            jitter,
            seed,
            out,
        } => gen(nx, ny, jitter, seed, &out),
        Action::Report => report(),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn run(input: &Path, out: &Path) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), "run");
    let text = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let case: RemapCase =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", input.display()))?;
    let (outcome, matrix) = run_case(&case)?;
    tracing::info!(
        rows = outcome.rows,
        cols = outcome.cols,
        nnz = outcome.nnz,
        uncovered = outcome.uncovered.len(),
        "remapped"
    );

    ensure_parent(out)?;
    fs::write(out, serde_json::to_vec_pretty(&outcome)?)
        .with_context(|| format!("writing {}", out.display()))?;
    let matrix_path = out.with_file_name("matrix.csv");
    write_matrix_csv(&matrix, &matrix_path)?;

    let params = json!({
        "nature": case.nature,
        "method": case.method,
        "n_components": case.n_components,
        "default": case.default,
        "options": case.options,
    });
    let input = input.to_string_lossy();
    write_sidecar(out, Payload::new(params.clone()).with_input(input.as_ref()))?;
    write_sidecar(&matrix_path, Payload::new(params).with_input(input.as_ref()))?;
    Ok(())
}

fn gen(nx: usize, ny: usize, jitter: f64, seed: u64, out: &Path) -> Result<()> {
    tracing::info!(nx, ny, jitter, seed, out = %out.display(), "gen");
    let case = gen_case(nx, ny, jitter, seed)?;
    ensure_parent(out)?;
    fs::write(out, serde_json::to_vec_pretty(&case)?)
        .with_context(|| format!("writing {}", out.display()))?;
    write_sidecar(
        out,
        Payload::new(json!({"nx": nx, "ny": ny, "jitter": jitter, "seed": seed})),
    )?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": current_git_rev(),
        "remap2d": remap2d::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn gen_then_run_writes_all_artifacts() {
        let dir = tempdir().unwrap();
        let case_path = dir.path().join("cases/grid.json");
        let out = dir.path().join("out/result.json");
        gen(2, 2, 0.1, 3, &case_path).unwrap();
        assert!(dir.path().join("cases/grid.provenance.json").exists());
        run(&case_path, &out).unwrap();
        for name in ["result.json", "matrix.csv", "result.provenance.json", "matrix.provenance.json"] {
            assert!(dir.path().join("out").join(name).exists(), "{name}");
        }
        let outcome: case::RemapOutcome =
            serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(outcome.rows, 18);
        assert_eq!(outcome.cols, 4);
    }
}
