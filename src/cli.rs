use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Generate a Swagger 2.0 document from a route manifest and the Rust types it names
#[derive(Parser, Debug)]
#[command(name = "swagger-from-routes")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Route manifest (YAML, or JSON with a .json extension)
    #[arg(value_name = "MANIFEST")]
    pub manifest_path: PathBuf,

    /// Directory containing the Rust sources of the payload types
    #[arg(short = 's', long = "source", value_name = "DIR")]
    pub source_path: Option<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Validate and log already-parsed arguments
pub fn validate_args(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.manifest_path.is_file() {
        anyhow::bail!(
            "Manifest file does not exist: {}",
            args.manifest_path.display()
        );
    }

    if let Some(source) = &args.source_path {
        if !source.is_dir() {
            anyhow::bail!("Source path is not a directory: {}", source.display());
        }
        info!("Type sources: {}", source.display());
    } else {
        info!("Type sources: none, named types will be emitted as generic objects");
    }

    info!("Manifest: {}", args.manifest_path.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::manifest::RouteManifest;
    use crate::openapi_builder::build_document;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
    use crate::source::SourceSet;
    use crate::type_resolver::TypeResolver;

    // Step 1: load the Rust sources describing payload types
    let sources = match &args.source_path {
        Some(path) => {
            info!("Loading type sources...");
            let sources = SourceSet::load(path)
                .with_context(|| format!("Failed to load sources from {}", path.display()))?;
            for warning in &sources.warnings {
                warn!("{}", warning);
            }
            info!("Parsed {} Rust files", sources.files.len());
            sources
        }
        None => SourceSet::default(),
    };
    let file_count = sources.files.len();
    let mut resolver = TypeResolver::from_sources(sources);

    // Step 2: read the route manifest and resolve its types
    info!("Reading route manifest...");
    let manifest = RouteManifest::from_path(&args.manifest_path)?;
    let api = manifest.into_api(&mut resolver);

    let group_routes: usize = api.groups.iter().map(|g| g.routes.len()).sum();
    if api.routes.is_empty() && group_routes == 0 {
        warn!("No routes declared in the manifest");
    }

    // Step 3: assemble the document
    info!("Building Swagger document...");
    let document = build_document(&api);

    // Step 4: serialize and write
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    if let Some(output_path) = &args.output_path {
        write_to_file(&content, output_path)?;
        info!("Wrote Swagger document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Summary:");
    info!("  - Source files parsed: {}", file_count);
    info!("  - Routes: {}", api.routes.len() + group_routes);
    info!("  - Paths: {}", document.paths.len());
    info!("  - Definitions: {}", document.definitions.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_args() {
        let args = CliArgs::parse_from([
            "swagger-from-routes",
            "routes.yaml",
            "-s",
            "src",
            "-f",
            "json",
            "-o",
            "out.json",
            "-v",
        ]);

        assert_eq!(args.manifest_path, PathBuf::from("routes.yaml"));
        assert_eq!(args.source_path, Some(PathBuf::from("src")));
        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.output_path, Some(PathBuf::from("out.json")));
        assert!(args.verbose);
    }

    #[test]
    fn test_default_format_is_yaml() {
        let args = CliArgs::parse_from(["swagger-from-routes", "routes.yaml"]);
        assert_eq!(args.output_format, OutputFormat::Yaml);
        assert!(args.source_path.is_none());
    }

    #[test]
    fn test_validate_rejects_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let args = CliArgs::parse_from([
            "swagger-from-routes".to_string(),
            dir.path().join("missing.yaml").display().to_string(),
        ]);
        assert!(validate_args(args).is_err());
    }

    #[test]
    fn test_run_writes_document() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(
            src.join("types.rs"),
            "pub struct Pong { #[swagger(required)] pub message: String }",
        )
        .unwrap();
        let manifest = dir.path().join("routes.yaml");
        fs::write(
            &manifest,
            "groups:\n  - path: /api\n    routes:\n      - method: get\n        path: /ping\n        response: Pong\n",
        )
        .unwrap();
        let output = dir.path().join("out").join("swagger.json");

        let args = CliArgs {
            manifest_path: manifest,
            source_path: Some(src),
            output_format: OutputFormat::Json,
            output_path: Some(output.clone()),
            verbose: false,
        };
        run(validate_args(args).unwrap()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(
            written["paths"]["/api/ping"]["get"]["responses"]["200"]["schema"]["$ref"],
            "#/definitions/Pong"
        );
        assert_eq!(written["definitions"]["Pong"]["required"][0], "message");
    }
}
