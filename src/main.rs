use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use colored::Colorize;
use pvctool::{
    config::Config,
    patch::{patch_file, PatchRule},
};

#[derive(Parser)]
#[command(version, about = "Migrate Kubernetes PVC storage classes in manifest files")]
struct Cli {
    /// Manifest files to process (overrides the config file list)
    files: Vec<PathBuf>,

    /// Path to the configuration file (default: ./pvctool.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report what would change without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Access mode a claim must request to qualify
    #[arg(long)]
    access_mode: Option<String>,

    /// Storage class to migrate from
    #[arg(long)]
    from_class: Option<String>,

    /// Storage class to migrate to
    #[arg(long)]
    to_class: Option<String>,
}

impl Cli {
    /// Resolves the effective configuration: config file first, then
    /// command-line overrides.
    fn resolve(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_default()?,
        };

        if !self.files.is_empty() {
            config.files = self.files.clone();
        }
        if let Some(mode) = &self.access_mode {
            config.rule.access_mode = mode.clone();
        }
        if let Some(class) = &self.from_class {
            config.rule.from_class = class.clone();
        }
        if let Some(class) = &self.to_class {
            config.rule.to_class = class.clone();
        }

        if config.files.is_empty() {
            bail!(
                "no manifest files given; pass paths on the command line or list them in {}",
                pvctool::config::DEFAULT_CONFIG_NAME
            );
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.resolve()?;

    run(&config, cli.dry_run)
}

/// Processes every configured file in order.
///
/// The first failing file aborts the run; files after it are not touched.
fn run(config: &Config, dry_run: bool) -> anyhow::Result<()> {
    let rule = &config.rule;
    let mut updated_files = 0usize;
    let mut updated_claims = 0usize;

    for path in &config.files {
        println!("Processing {}...", path.display());

        let patched = patch_file(path, rule, dry_run)?;
        for pvc in &patched {
            if dry_run {
                println!("Would update {pvc} to use {} storage", rule.to_class);
            } else {
                println!("Updated {pvc} to use {} storage", rule.to_class);
            }
        }

        if patched.is_empty() {
            println!("No changes needed for {}", path.display());
        } else {
            updated_files += 1;
            updated_claims += patched.len();
            if dry_run {
                println!(
                    "{}",
                    format!("Would update {}", path.display()).yellow().bold()
                );
            } else {
                println!(
                    "{}",
                    format!("✅ Updated {}", path.display()).green().bold()
                );
            }
        }
    }

    print_summary(rule, dry_run, updated_files, updated_claims);
    Ok(())
}

fn print_summary(rule: &PatchRule, dry_run: bool, files: usize, claims: usize) {
    if claims == 0 {
        println!(
            "\nNo {} PVCs using the {} storage class found",
            rule.access_mode, rule.from_class
        );
    } else if dry_run {
        println!(
            "\n{}",
            format!(
                "{claims} PVC(s) in {files} file(s) would move to the {} storage class",
                rule.to_class
            )
            .yellow()
            .bold()
        );
    } else {
        println!(
            "\n{}",
            format!(
                "✅ {claims} PVC(s) in {files} file(s) updated to the {} storage class",
                rule.to_class
            )
            .green()
            .bold()
        );
    }
}
