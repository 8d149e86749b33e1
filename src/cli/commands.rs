use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::emit::{write_artifact, Renderer, SourceRenderer};
use crate::routes::ParamStyle;
use crate::schema::{build_schema, load_manifest};
use crate::walker::walk;

/// Command-line interface for the cascader route compiler.
#[derive(Parser)]
#[command(name = "cascader-gen")]
#[command(about = "Cascader route compiler CLI", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compile a schema tree into a wired route module
    Compile {
        /// Schema manifest file (YAML/JSON) or schema directory tree
        #[arg(short, long)]
        schema: PathBuf,

        /// Output directory for the emitted artifact
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite existing output files
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Show what would be written without writing anything
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Parameter syntax of the hosting router
        #[arg(long, value_enum, default_value_t = ParamStyleArg::Colon)]
        param_style: ParamStyleArg,
    },
    /// Print the compiled route table without emitting anything
    Inspect {
        /// Schema manifest file (YAML/JSON) or schema directory tree
        #[arg(short, long)]
        schema: PathBuf,
    },
    /// Scaffold default declaration files for a schema directory tree
    Scaffold {
        /// Schema directory tree root
        #[arg(short, long)]
        schema: PathBuf,
    },
}

/// Hosting-router parameter syntax, as a CLI flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ParamStyleArg {
    /// `/tasks/:id`
    Colon,
    /// `/tasks/{id}`
    Braces,
}

impl From<ParamStyleArg> for ParamStyle {
    fn from(arg: ParamStyleArg) -> Self {
        match arg {
            ParamStyleArg::Colon => ParamStyle::Colon,
            ParamStyleArg::Braces => ParamStyle::Braces,
        }
    }
}

/// Execute the CLI command provided by the user.
///
/// # Errors
///
/// Returns an error if the schema cannot be loaded, the tree violates a
/// structural constraint, or the artifact cannot be written.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Compile {
            schema,
            output,
            force,
            dry_run,
            param_style,
        } => {
            if schema.is_dir() {
                // Scaffold first; compilation then treats the tree as
                // immutable input.
                crate::scaffold::scaffold_tree(schema)?;
            }
            let manifest = load_manifest(schema)?;
            let (root, introspector) = build_schema(&manifest)?;
            let table = walk(&root, &introspector)?;
            let renderer = SourceRenderer::new((*param_style).into());
            let artifact = renderer.emit(&table)?;
            write_artifact(&artifact, output, *force, *dry_run)?;
            println!("✅ Compiled {} route(s)", table.len());
            Ok(())
        }
        Commands::Inspect { schema } => {
            let manifest = load_manifest(schema)?;
            let (root, introspector) = build_schema(&manifest)?;
            let table = walk(&root, &introspector)?;
            for entry in &table {
                println!(
                    "{} {} → [{}]",
                    entry.method,
                    entry.path.template(ParamStyle::Colon),
                    entry.pipeline.tags().join(", ")
                );
            }
            println!("{} route(s)", table.len());
            Ok(())
        }
        Commands::Scaffold { schema } => {
            let created = crate::scaffold::scaffold_tree(schema)?;
            println!("✅ Scaffolded {created} file(s)");
            Ok(())
        }
    }
}
