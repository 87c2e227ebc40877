mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pv", version, about = "Prompt variables and prompt-data conversion")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved paths
    Doctor,

    /// Manage custom variables
    #[command(subcommand)]
    Vars(VarsCommand),

    /// List the variables a prompt file references
    Scan(FileArgs),

    /// Detect the format of a prompt data file and validate it
    Detect(FileArgs),

    /// Convert prompt data to another format
    Convert(ConvertArgs),

    /// Derive a template from prompt data, or fill it with --var values
    Template(TemplateArgs),

    /// Suggest variable names for a piece of text
    Suggest(SuggestArgs),

    /// Replace a byte range of a file with a {{name}} placeholder
    Extract(ExtractArgs),
}

#[derive(Debug, Subcommand)]
pub enum VarsCommand {
    /// List predefined and custom variables
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print the value of a custom variable
    Get { name: String },
    /// Create or update a custom variable
    Set { name: String, value: String },
    /// Delete a custom variable
    Delete { name: String },
    /// Delete every custom variable
    Clear,
    /// Print or write the custom variables as JSON
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Merge variables from an export file
    Import { file: PathBuf },
}

#[derive(Debug, Args)]
pub struct FileArgs {
    pub file: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TargetFormat {
    Standard,
    Openai,
    Conversation,
    Template,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    pub file: PathBuf,

    #[arg(long, value_enum)]
    pub to: TargetFormat,

    /// Variable value applied before conversion (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = cmd::parse_var)]
    pub vars: Vec<(String, String)>,

    /// Substitute stored custom variables too; --var values win
    #[arg(long)]
    pub resolve: bool,

    /// Write to this file name under the export dir instead of stdout
    #[arg(long)]
    pub out: Option<String>,

    /// Write to the export dir with a generated file name
    #[arg(long, conflicts_with = "out")]
    pub save: bool,
}

#[derive(Debug, Args)]
pub struct TemplateArgs {
    pub file: PathBuf,

    /// Fill the template instead of printing it (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = cmd::parse_var)]
    pub vars: Vec<(String, String)>,

    /// Print merge/split suggestions for the template variables
    #[arg(long)]
    pub optimize: bool,
}

#[derive(Debug, Args)]
pub struct SuggestArgs {
    pub text: String,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    pub file: PathBuf,

    #[arg(long)]
    pub name: String,

    /// Byte offset where the selection starts
    #[arg(long)]
    pub start: usize,

    /// Byte offset where the selection ends (exclusive)
    #[arg(long)]
    pub end: usize,

    /// Text the range is expected to hold; the command fails if it moved
    #[arg(long)]
    pub expect: Option<String>,

    /// Rewrite the file in place instead of printing the result
    #[arg(long)]
    pub write: bool,

    /// Also save the extracted value as a custom variable
    #[arg(long)]
    pub store: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(config),
        Commands::Vars(sub) => cmd::vars::run(config, sub).await,
        Commands::Scan(args) => cmd::scan::run(config, &args.file).await,
        Commands::Detect(args) => cmd::detect::run(config, &args.file),
        Commands::Convert(args) => cmd::convert::run(config, &args).await,
        Commands::Template(args) => cmd::template::run(config, &args).await,
        Commands::Suggest(args) => cmd::suggest::run(config, &args),
        Commands::Extract(args) => cmd::extract::run(config, &args).await,
    }
}
