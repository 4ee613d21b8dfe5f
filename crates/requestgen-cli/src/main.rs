//! requestgen CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::fs;

use requestgen_core::{generate, Config, DeclarationSet, Registry};

#[derive(Parser)]
#[command(name = "requestgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate request-builder companions for annotated type declarations
    Generate {
        /// Path or URL to the declaration set (YAML or JSON)
        ///
        /// Can be a local file path or an HTTP/HTTPS URL
        /// Example: --schema decls.yaml
        /// Example: --schema https://example.com/decls.json
        #[arg(long)]
        schema: Option<String>,
        /// Comma-separated names of the request types to generate for
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        /// HTTP method for the generated dispatch method
        #[arg(long)]
        method: Option<String>,
        /// Static URL template, `:slug` tokens allowed
        #[arg(long)]
        url: Option<String>,
        /// Resolve the path at runtime through the DynamicPath capability
        #[arg(long)]
        dynamic_path: bool,
        /// Response envelope type decoded by the dispatch method
        #[arg(long)]
        response_type: Option<String>,
        /// Inner payload type unwrapped out of the response envelope
        #[arg(long)]
        response_data_type: Option<String>,
        /// Envelope field holding the inner payload
        #[arg(long)]
        response_data_field: Option<String>,
        /// Write the generated source to stdout instead of a file
        #[arg(long)]
        stdout: bool,
        /// Output file (default: <snake_case_type>_requestgen.rs)
        #[arg(long)]
        output: Option<PathBuf>,
        /// YAML config file; explicit flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            schema,
            types,
            method,
            url,
            dynamic_path,
            response_type,
            response_data_type,
            response_data_field,
            stdout,
            output,
            config,
        } => {
            let mut run_config = match &config {
                Some(path) => Config::from_file(path)
                    .await
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => Config::default(),
            };

            // Explicit flags win over the config file.
            if let Some(schema) = schema {
                run_config.schema = schema;
            }
            if !types.is_empty() {
                run_config.types = types;
            }
            if let Some(method) = method {
                run_config.method = method;
            }
            if let Some(url) = url {
                run_config.url = Some(url);
            }
            if dynamic_path {
                run_config.dynamic_path = true;
            }
            if let Some(response_type) = response_type {
                run_config.response_type = Some(response_type);
            }
            if let Some(response_data_type) = response_data_type {
                run_config.response_data_type = Some(response_data_type);
            }
            if let Some(response_data_field) = response_data_field {
                run_config.response_data_field = Some(response_data_field);
            }
            if let Some(output) = output {
                run_config.output = Some(output);
            }
            run_config.validate().context("invalid generation config")?;

            println!("Loading declaration set from: {}", run_config.schema);
            let set = DeclarationSet::from_file_or_url(&run_config.schema)
                .await
                .context("failed to load declaration set")?;
            let registry = Registry::new(set);

            let report = generate(&registry, &run_config)
                .await
                .context("generation failed")?;

            for failure in &report.failures {
                eprintln!("error: {}: {}", failure.type_name, failure.error);
            }

            if report.units.is_empty() {
                anyhow::bail!("no types generated");
            }

            if stdout {
                print!("{}", report.output);
            } else {
                let out_path = run_config.output_path_for(&run_config.types[0]);
                fs::write(&out_path, &report.output)
                    .await
                    .with_context(|| format!("failed to write {}", out_path.display()))?;
                println!(
                    "Generated {} type(s) into: {}",
                    report.units.len(),
                    out_path.display()
                );
            }

            if !report.is_complete() {
                anyhow::bail!("{} type(s) failed to generate", report.failures.len());
            }
        }
    }
    Ok(())
}
