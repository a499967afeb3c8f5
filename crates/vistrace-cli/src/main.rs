use clap::{Parser, Subcommand, ValueEnum};
use vistrace_parse::parse_str;
use vistrace_trace::{synthesize, Step, StepKind, StepLog};

/// Maximum source file size in bytes (1MB)
const MAX_SOURCE_SIZE: usize = 1_000_000;

#[derive(Parser, Debug)]
#[command(name = "vistrace")]
#[command(about = "vistrace: synthesize step-by-step execution traces for animation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a program and print its step log
    Trace {
        /// Path to source file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// Parse a source file and dump the syntax tree
    Parse {
        /// Path to source file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
}

#[derive(ValueEnum, Clone, Debug)]
enum Format {
    Pretty,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Trace { file, format } => cmd_trace(&file, format),
        Commands::Parse { file, format } => cmd_parse(&file, format),
    }
}

fn load_source(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let src = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read '{}': {}", path, e))?;

    if src.len() > MAX_SOURCE_SIZE {
        eprintln!(
            "Error: source file exceeds {}MB limit ({} bytes)",
            MAX_SOURCE_SIZE / 1_000_000,
            src.len()
        );
        std::process::exit(1);
    }

    Ok(src)
}

fn cmd_trace(file: &str, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let src = load_source(file)?;
    let program = parse_str(file, &src)?;

    match synthesize(&program) {
        Ok(log) => {
            print_log(&log, &format)?;
            Ok(())
        }
        Err(abort) => {
            // show the completed prefix, then the failure
            print_log(&abort.steps, &format)?;
            eprintln!("Error: {}", abort.error);
            std::process::exit(1);
        }
    }
}

fn print_log(log: &StepLog, format: &Format) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Pretty => {
            for step in log {
                println!("{}", render_step(step));
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(log)?),
    }
    Ok(())
}

fn render_step(step: &Step) -> String {
    let indent = "  ".repeat(step.depth.saturating_sub(1) as usize);
    let body = match &step.kind {
        StepKind::Assign { name, stage } => format!("{name} = {stage}"),
        StepKind::Print { stage } => format!("print {stage}"),
        StepKind::ForFrame { condition, .. } => format!(
            "for {} in range({}, {}, {}) @ {}",
            condition.target, condition.start, condition.end, condition.step, condition.current
        ),
        StepKind::IfFrame { guard: Some(g) } => format!("if {g}"),
        StepKind::IfFrame { guard: None } => "else".to_string(),
        StepKind::WhileFrame { stage } => format!("while {stage}"),
        StepKind::Break => "break".to_string(),
    };
    format!("L{:<4}{indent}{body}", step.id)
}

fn cmd_parse(file: &str, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let src = load_source(file)?;
    let program = parse_str(file, &src)?;

    match format {
        Format::Pretty => println!("{:#?}", program),
        Format::Json => println!("{}", serde_json::to_string_pretty(&program)?),
    }
    Ok(())
}
