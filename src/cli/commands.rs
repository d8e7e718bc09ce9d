use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AI-assisted legacy code conversion workflow client
#[derive(Parser, Debug)]
#[command(
    name = "relift",
    about = "AI-assisted legacy code conversion workflow client",
    version,
    author,
    long_about = "relift drives a modernization workflow against a remote analysis and \
                  conversion service: upload legacy source files (COBOL, JCL, copybooks, \
                  BMS maps), generate a requirements analysis, then convert the code to a \
                  modern target language and collect the generated artifacts."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run the full conversion workflow",
        long_about = "Uploads legacy source files, generates a requirements analysis, converts \
                      the code, and writes all artifacts to the output directory.\n\n\
                      Examples:\n  \
                      relift run ./legacy\n  \
                      relift run BANKING.CBL RUN.JCL --output ./converted\n  \
                      relift run ./legacy --target-language Java --analyze-only"
    )]
    Run(RunArgs),

    #[command(
        about = "Check service availability",
        long_about = "Probes the modernization service health endpoint.\n\n\
                      Examples:\n  \
                      relift health\n  \
                      relift health --service-url http://converter.internal:9000/cobo"
    )]
    Health(HealthArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[arg(
        value_name = "PATH",
        required = true,
        help = "Legacy source files, or directories to scan for them"
    )]
    pub sources: Vec<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        default_value = "relift-output",
        help = "Directory for generated requirements and conversion artifacts"
    )]
    pub output: PathBuf,

    #[arg(
        short = 't',
        long,
        value_name = "LANG",
        help = "Conversion target language (overrides RELIFT_TARGET_LANGUAGE)"
    )]
    pub target_language: Option<String>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Standards documents to upload before analysis (optional)"
    )]
    pub standards: Vec<PathBuf>,

    #[arg(long, help = "Stop after analysis and write the requirements only")]
    pub analyze_only: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct HealthArgs {
    #[arg(long, value_name = "URL", help = "Override the service base URL")]
    pub service_url: Option<String>,
}
