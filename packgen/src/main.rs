use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod cmds;

#[derive(Parser)]
#[command(name = "packgen")]
#[command(
    about = "Layout-optimizing C++ class generator for record and union schemas",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /* Generate C++ headers from schema documents */
    Codegen {
        /* Input schema files (JSON or YAML) */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Output directory for generated headers */
        #[arg(
            short = 'o',
            long = "output",
            value_name = "DIR",
            default_value = "generated"
        )]
        output_dir: PathBuf,

        /* Wrap the generated classes in a namespace */
        #[arg(long = "namespace", value_name = "NAME")]
        namespace: Option<String>,

        /* Emit storage members only */
        #[arg(long = "no-accessors")]
        no_accessors: bool,

        /* Omit the size/alignment comment above each class */
        #[arg(long = "no-layout-comments")]
        no_layout_comments: bool,

        /* Enable verbose output */
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },

    /* Show the optimized layout of every type */
    Analyze {
        /* Input schema files (JSON or YAML) */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Report format */
        #[arg(long = "format", value_enum, default_value = "text")]
        format: ReportFormat,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum ReportFormat {
    Text,
    Json,
}

impl From<ReportFormat> for cmds::analyze::ReportFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Text => cmds::analyze::ReportFormat::Text,
            ReportFormat::Json => cmds::analyze::ReportFormat::Json,
        }
    }
}

/* Enable with `RUST_LOG=packgen=debug` or `RUST_LOG=packgen=trace` */
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Codegen {
            files,
            output_dir,
            namespace,
            no_accessors,
            no_layout_comments,
            verbose,
        } => {
            let options = cmds::codegen::CodegenOptions {
                namespace,
                emit_accessors: !no_accessors,
                emit_layout_comments: !no_layout_comments,
            };
            cmds::codegen::run(files, output_dir, options, verbose)?;
        }

        Commands::Analyze { files, format } => {
            cmds::analyze::run(files, format.into())?;
        }
    }

    Ok(())
}
