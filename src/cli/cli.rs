use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::generator::{render_model, write_model_file, GenerationOptions};
use crate::schema::{collect_schema, load_registry};
use crate::security::{ApiKeyAdminAuth, TokenStore};
use crate::server::{AdminService, HttpServer};

#[derive(Parser)]
#[command(name = "postforge")]
#[command(about = "Content-type model generator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the data-access model for one content type
    Generate {
        /// Schema registry file (YAML or JSON)
        #[arg(short, long)]
        registry: PathBuf,

        /// Content type to generate
        #[arg(short, long)]
        post_type: String,

        /// Emit per-property accessors instead of the generic get/set pair
        #[arg(long, default_value_t = false)]
        explicit: bool,

        /// Append a smoke-test module to the output
        #[arg(long, default_value_t = false)]
        tests: bool,

        /// Output directory, or `-` to print to stdout
        #[arg(short, long, default_value = ".")]
        output: String,

        /// Overwrite an existing output file
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// Serve the admin form and generation endpoint
    Serve {
        /// Schema registry file (YAML or JSON)
        #[arg(short, long)]
        registry: PathBuf,

        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,

        /// Admin capability key, required for every admin request
        #[arg(long, env = "POSTFORGE_ADMIN_KEY")]
        admin_key: String,
    },
}

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            registry,
            post_type,
            explicit,
            tests,
            output,
            force,
        } => {
            let source = load_registry(&registry)?;
            let schema = collect_schema(&source, &post_type)?;
            let opts = GenerationOptions {
                magic_accessors: !explicit,
                emit_tests: tests,
            };
            if output == "-" {
                print!("{}", render_model(&schema, &opts));
            } else {
                write_model_file(PathBuf::from(output).as_path(), &schema, &opts, force)?;
            }
            Ok(())
        }
        Commands::Serve {
            registry,
            addr,
            admin_key,
        } => {
            anyhow::ensure!(!admin_key.trim().is_empty(), "admin key must not be empty");
            let source = load_registry(&registry)?;
            tracing::info!(
                registry = %registry.display(),
                content_types = source.content_types.len(),
                %addr,
                "starting admin service"
            );
            let service = AdminService::new(
                Arc::new(source),
                Arc::new(ApiKeyAdminAuth::new(admin_key).cookie_name("admin_key")),
                Arc::new(TokenStore::new(ulid::Ulid::new().to_string())),
            );
            let handle = HttpServer(service).start(&addr)?;
            handle
                .join()
                .map_err(|e| anyhow::anyhow!("server exited abnormally: {e:?}"))?;
            Ok(())
        }
    }
}
