use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quartzc")]
#[command(about = "Quartz - annotated contract language compiler")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a contract to target source and ABI
    Build {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        abi: Option<PathBuf>,

        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze a contract and report diagnostics without generating code
    Check {
        input: PathBuf,

        #[arg(short, long)]
        verbose: bool,
    },

    /// Dump the merged contract IR as JSON
    Inspect {
        input: PathBuf,

        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            abi,
            verbose,
        } => cmd_build(input, output, abi, verbose),
        Commands::Check { input, verbose } => cmd_check(input, verbose),
        Commands::Inspect { input, verbose } => cmd_inspect(input, verbose),
    }
}

fn print_diagnostics(diagnostics: &quartz::Diagnostics) {
    use colored::*;

    for diag in diagnostics.iter() {
        let line = diag.to_string();
        match diag.level {
            quartz::Level::Error => eprintln!("{}", line.bright_red()),
            quartz::Level::Warning => eprintln!("{}", line.yellow()),
        }
    }
}

fn cmd_build(
    input: PathBuf,
    output: Option<PathBuf>,
    abi: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    use colored::*;
    use std::fs;
    use std::time::Instant;

    if verbose {
        println!("{}", " Quartz Compiler".bright_blue().bold());
        println!("{}", "=".repeat(50).bright_blue());
        println!(" Input: {}", input.display());
        if let Some(ref out) = output {
            println!(" Output: {}", out.display());
        }
        println!();
    }

    let start = Instant::now();

    if verbose {
        println!(" Loading contract source...");
    }
    let source = fs::read_to_string(&input)?;
    let filename = input.display().to_string();

    if verbose {
        println!(" Compiling...");
    }

    let compiled = match quartz::compile(&source, &filename) {
        Ok(compiled) => compiled,
        Err(quartz::CompileError::Analysis { diagnostics }) => {
            print_diagnostics(&diagnostics);
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    print_diagnostics(&compiled.diagnostics);

    if let Some(abi_path) = abi.or_else(|| output.as_ref().map(|p| p.with_extension("abi.json"))) {
        fs::write(&abi_path, &compiled.abi_json)?;
        if verbose {
            println!("   ABI: {}", abi_path.display());
        }
    }

    if let Some(output_path) = output {
        fs::write(&output_path, &compiled.target_source)?;
        if verbose {
            let elapsed = start.elapsed();
            println!(
                "\n {} Compilation successful!",
                "SUCCESS:".bright_green().bold()
            );
            println!("   Time: {:.3}s", elapsed.as_secs_f64());
            println!("   Output: {}", output_path.display());
        }
    } else {
        println!("{}", compiled.target_source);
    }

    Ok(())
}

fn cmd_check(input: PathBuf, verbose: bool) -> Result<()> {
    use colored::*;
    use std::fs;

    if verbose {
        println!("{}", " Checking contract".bright_cyan().bold());
        println!(" Input: {}", input.display());
        println!();
    }

    let source = fs::read_to_string(&input)?;
    let filename = input.display().to_string();

    let analysis = quartz::analyze_source(&source, &filename);
    print_diagnostics(&analysis.diagnostics);

    if analysis.diagnostics.has_errors() {
        println!("{}", " INVALID".bright_red().bold());
        std::process::exit(1);
    }

    println!("{}", " VALID".bright_green().bold());
    if verbose {
        if let Some(contract) = &analysis.contract {
            println!("   Contract: {}", contract.name);
            println!("   Storage fields: {}", contract.storage.len());
            println!("   Methods: {}", contract.methods.len());
        }
    }
    Ok(())
}

fn cmd_inspect(input: PathBuf, verbose: bool) -> Result<()> {
    use colored::*;
    use std::fs;

    let source = fs::read_to_string(&input)?;
    let filename = input.display().to_string();

    let analysis = quartz::analyze_source(&source, &filename);
    print_diagnostics(&analysis.diagnostics);

    let contract = match analysis.contract {
        Some(contract) if !analysis.diagnostics.has_errors() => contract,
        _ => {
            println!("{}", " Nothing to inspect".bright_red().bold());
            std::process::exit(1);
        }
    };

    if verbose {
        println!(
            "{}",
            format!(" Contract: {}", contract.name).bright_green().bold()
        );
        for field in &contract.storage {
            println!(
                "   slot {} = {}: {:?}",
                field.slot.map(|s| s.to_string()).unwrap_or_default(),
                field.name,
                field.ty
            );
        }
        for method in &contract.methods {
            println!(
                "   fn {} ({:?}, {} params)",
                method.name,
                method.visibility,
                method.params.len()
            );
        }
        println!();
    }

    println!("{}", serde_json::to_string_pretty(&contract)?);
    Ok(())
}
