use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Crates the domain layer must never depend on.
const FORBIDDEN_DOMAIN_DEPS: &[&str] = &["tokio", "async-trait", "rand", "dashmap", "anyhow", "tracing"];

const DOMAIN_PACKAGE: &str = "naturieux-domain";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    manifest_path: PathBuf,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    kind: Option<String>,
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata output")?;

    let domain = metadata
        .packages
        .iter()
        .find(|p| p.name == DOMAIN_PACKAGE)
        .with_context(|| format!("package {DOMAIN_PACKAGE} not found in workspace"))?;

    let mut violations = Vec::new();

    for dep in &domain.dependencies {
        // dev-dependencies are allowed anything
        if dep.kind.as_deref() == Some("dev") {
            continue;
        }
        if FORBIDDEN_DOMAIN_DEPS.contains(&dep.name.as_str()) {
            violations.push(format!("{DOMAIN_PACKAGE} depends on `{}`", dep.name));
        }
    }

    let src_dir = domain
        .manifest_path
        .parent()
        .map(|dir| dir.join("src"))
        .context("domain manifest has no parent directory")?;
    violations.extend(scan_sources(&src_dir)?);

    if violations.is_empty() {
        println!("arch-check: ok");
        return Ok(());
    }

    for violation in &violations {
        eprintln!("arch-check: {violation}");
    }
    anyhow::bail!("arch-check found {} violation(s)", violations.len())
}

/// Flag wall-clock reads and RNG use in domain sources outside test modules.
fn scan_sources(dir: &Path) -> anyhow::Result<Vec<String>> {
    let pattern = regex_lite::Regex::new(r"\b(Utc::now\(\)|thread_rng\(\)|std::fs::|tokio::)")
        .context("compiling source pattern")?;

    let mut violations = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(path) = pending.pop() {
        for entry in std::fs::read_dir(&path).with_context(|| format!("reading {}", path.display()))? {
            let entry = entry?;
            let entry_path = entry.path();
            if entry_path.is_dir() {
                pending.push(entry_path);
                continue;
            }
            if entry_path.extension().and_then(|e| e.to_str()) != Some("rs") {
                continue;
            }

            let contents = std::fs::read_to_string(&entry_path)
                .with_context(|| format!("reading {}", entry_path.display()))?;
            let production = contents
                .split("#[cfg(test)]")
                .next()
                .unwrap_or_default();

            for (line_no, line) in production.lines().enumerate() {
                if line.trim_start().starts_with("//") {
                    continue;
                }
                if let Some(found) = pattern.find(line) {
                    violations.push(format!(
                        "{}:{} uses `{}`",
                        entry_path.display(),
                        line_no + 1,
                        found.as_str()
                    ));
                }
            }
        }
    }

    Ok(violations)
}
