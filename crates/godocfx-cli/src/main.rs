//! godocfx CLI - DocFX YAML for the packages of a Go module

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use godocfx_core::{generate, toc_yaml, write_docset, Config, GodocHtml, CONFIG_FILE};
use godocfx_pkg::{
    GoListLoader, JsonUnitLoader, PackageSelector, SelectOptions, SidecarSource, UnitLoader,
};

#[derive(Parser, Debug)]
#[command(name = "godocfx")]
#[command(version = godocfx_core::VERSION)]
#[command(about = "Generate DocFX YAML for the packages of a Go module", long_about = None)]
struct Cli {
    /// Package pattern to document, usually ending in `...`
    pattern: String,

    /// Output directory
    #[arg(short, long, default_value = "obj/api")]
    out: PathBuf,

    /// Directory the pattern is evaluated in
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    /// Configuration file (defaults to godocfx.toml in the working directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Files relative to the module root to publish (comma-separated)
    #[arg(long, value_delimiter = ',')]
    extra_files: Option<Vec<String>>,

    /// Import path prefixes to leave out
    #[arg(long, value_delimiter = ',')]
    filter: Vec<String>,

    /// Import path prefixes documented on the same site
    #[arg(long, value_delimiter = ',')]
    same_domain: Vec<String>,

    /// Read package metadata from a saved `go list -json` stream
    #[arg(long)]
    units_file: Option<PathBuf>,

    /// Print the table of contents instead of writing files
    #[arg(long)]
    print: bool,
}

impl Cli {
    /// Load the configuration file and apply command-line overrides.
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_path(path)
                .with_context(|| format!("failed to load config '{}'", path.display()))?,
            None => {
                let default = self.work_dir.join(CONFIG_FILE);
                if default.is_file() {
                    Config::from_path(&default)
                        .with_context(|| format!("failed to load config '{}'", default.display()))?
                } else {
                    Config::default()
                }
            }
        };

        if let Some(extra_files) = &self.extra_files {
            config.run.extra_files = extra_files.clone();
        }
        if !self.filter.is_empty() {
            config.run.filter = self.filter.clone();
        }
        if !self.same_domain.is_empty() {
            config.links.same_domain = self.same_domain.clone();
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;

    let loader: Box<dyn UnitLoader> = match &cli.units_file {
        Some(path) => Box::new(JsonUnitLoader::new(path)),
        None => Box::new(GoListLoader::default()),
    };
    let source = SidecarSource;

    let options = SelectOptions::new(&cli.pattern, &cli.work_dir).with_filter(config.run.filter.clone());
    let selection = PackageSelector::new(loader.as_ref(), &source)
        .select(&options)
        .with_context(|| format!("failed to select packages for '{}'", cli.pattern))?;
    tracing::info!(
        module = %selection.module.path,
        packages = selection.packages.len(),
        "selected packages"
    );

    let docset = generate(&selection, &config, &source, &GodocHtml)
        .context("failed to generate documentation")?;

    if cli.print {
        print!("{}", toc_yaml(&docset.toc)?);
        return Ok(());
    }

    write_docset(&cli.out, &docset)
        .with_context(|| format!("failed to write output to '{}'", display(&cli.out)))?;
    println!(
        "Generated {} page(s) for {} in {}",
        docset.pages.len(),
        docset.module.path,
        display(&cli.out)
    );
    Ok(())
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(
                    "godocfx=info"
                        .parse::<tracing_subscriber::filter::Directive>()
                        .context("invalid tracing directive")?,
                ),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["godocfx", "./..."]);
        assert_eq!(cli.pattern, "./...");
        assert_eq!(cli.out, PathBuf::from("obj/api"));
        assert!(cli.extra_files.is_none());
        assert!(!cli.print);
    }

    #[test]
    fn test_overrides_apply_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[links]\nsame_domain = [\"example.com\"]\n\n[run]\nfilter = [\"example.com/m/gen\"]\n",
        )
        .unwrap();

        let work_dir = dir.path().to_string_lossy().into_owned();
        let cli = Cli::parse_from([
            "godocfx",
            "./...",
            "--work-dir",
            work_dir.as_str(),
            "--extra-files",
            "README.md,CHANGES.md",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.links.same_domain, vec!["example.com"]);
        assert_eq!(config.run.filter, vec!["example.com/m/gen"]);
        assert_eq!(config.run.extra_files, vec!["README.md", "CHANGES.md"]);

        let cli = Cli::parse_from([
            "godocfx",
            "./...",
            "--work-dir",
            work_dir.as_str(),
            "--same-domain",
            "a.com,b.com",
            "--filter",
            "x",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.links.same_domain, vec!["a.com", "b.com"]);
        assert_eq!(config.run.filter, vec!["x"]);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let cli = Cli::parse_from(["godocfx", "./...", "--config", "/nonexistent/godocfx.toml"]);
        assert!(cli.resolve_config().is_err());
    }
}
