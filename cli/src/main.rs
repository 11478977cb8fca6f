//! gavel CLI - agenda structure recovery tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use gavel::{
    build_agenda, extract_lines, read_labeled_csv, read_training_dir, render, split_holdout,
    write_labeled_csv, write_lines_csv, AgendaPipeline, DocumentRequest, JsonFormat,
    LineClassifier, TrainOptions,
};

#[derive(Parser)]
#[command(name = "gavel")]
#[command(version)]
#[command(about = "Recover meeting/section/item structure from agenda page dumps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract lines from a page-dump JSON into a CSV table for annotation
    Extract {
        /// Input page-dump JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Agency identifier (default: parsed from the file stem)
        #[arg(long)]
        agency: Option<String>,

        /// Meeting date (default: parsed from the file stem)
        #[arg(long)]
        date: Option<String>,

        /// Output CSV file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Train a line classifier on a directory of labeled CSV tables
    Train {
        /// Directory of labeled .csv tables
        #[arg(value_name = "DIR")]
        data: PathBuf,

        /// Output model file
        #[arg(short, long, value_name = "FILE", default_value = "model.json")]
        output: PathBuf,

        /// Fraction of rows held out for evaluation (0 disables)
        #[arg(long, default_value = "0.2")]
        holdout: f64,

        /// Shuffle seed for folds and the holdout split
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Number of cross-validation folds
        #[arg(long, default_value = "5")]
        folds: usize,
    },

    /// Classify the lines of a page dump with a trained model
    Classify {
        /// Input page-dump JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Trained model file
        #[arg(short, long, value_name = "FILE", default_value = "model.json")]
        model: PathBuf,

        /// Agency identifier (default: parsed from the file stem)
        #[arg(long)]
        agency: Option<String>,

        /// Meeting date (default: parsed from the file stem)
        #[arg(long)]
        date: Option<String>,

        /// Output labeled CSV file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Build a structured agenda from an already-labeled CSV table
    Structure {
        /// Input labeled CSV table
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Agency identifier (default: taken from the first row)
        #[arg(long)]
        agency: Option<String>,

        /// Meeting date (default: taken from the first row)
        #[arg(long)]
        date: Option<String>,

        /// Output JSON file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Run the full pipeline over one or more page dumps
    Run {
        /// Input page-dump JSON files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Trained model file
        #[arg(short, long, value_name = "FILE", default_value = "model.json")]
        model: PathBuf,

        /// Output directory for structured agenda JSON
        #[arg(short, long, value_name = "DIR", default_value = "structured")]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            agency,
            date,
            output,
        } => cmd_extract(&input, agency, date, output.as_deref()),
        Commands::Train {
            data,
            output,
            holdout,
            seed,
            folds,
        } => cmd_train(&data, &output, holdout, seed, folds),
        Commands::Classify {
            input,
            model,
            agency,
            date,
            output,
        } => cmd_classify(&input, &model, agency, date, output.as_deref()),
        Commands::Structure {
            input,
            agency,
            date,
            output,
            compact,
        } => cmd_structure(&input, agency, date, output.as_deref(), compact),
        Commands::Run {
            inputs,
            model,
            output,
            compact,
        } => cmd_run(&inputs, &model, &output, compact),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Parse `{agency}_{date}` provenance from a file stem, e.g.
/// "gavilan_04-05-2016.json".
fn provenance(
    path: &Path,
    agency: Option<String>,
    date: Option<String>,
) -> Result<(String, String), Box<dyn std::error::Error>> {
    if let (Some(a), Some(d)) = (&agency, &date) {
        return Ok((a.clone(), d.clone()));
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut parts = stem.splitn(2, '_');
    let stem_agency = parts.next().unwrap_or_default().to_string();
    let stem_date = parts.next().unwrap_or_default().to_string();
    let a = agency.unwrap_or(stem_agency);
    let d = date.unwrap_or(stem_date);
    if a.is_empty() || d.is_empty() {
        return Err(format!(
            "cannot parse agency/date from {:?}; pass --agency and --date",
            path.display()
        )
        .into());
    }
    Ok((a, d))
}

fn cmd_extract(
    input: &Path,
    agency: Option<String>,
    date: Option<String>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (agency, date) = provenance(input, agency, date)?;
    let lines = extract_lines(input, &agency, &date)?;

    match output {
        Some(path) => {
            write_lines_csv(&lines, fs::File::create(path)?)?;
            println!(
                "{} {} lines to {}",
                "Extracted".green(),
                lines.len(),
                path.display()
            );
        }
        None => write_lines_csv(&lines, std::io::stdout().lock())?,
    }
    Ok(())
}

fn cmd_train(
    data: &Path,
    output: &Path,
    holdout: f64,
    seed: u64,
    folds: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let labeled = read_training_dir(data)?;
    println!("{} {} labeled lines", "Loaded".green(), labeled.len());

    let options = TrainOptions {
        cv_folds: folds,
        seed,
        ..Default::default()
    };

    let classifier = if holdout > 0.0 {
        let (train, held) = split_holdout(&labeled, holdout, seed);
        let classifier = LineClassifier::train(&train, &options)?;
        let eval = classifier.evaluate(&held)?;
        println!("\n{} ({} held-out lines)", "Evaluation".green().bold(), held.len());
        print!("{eval}");
        classifier
    } else {
        LineClassifier::train(&labeled, &options)?
    };

    classifier.save_path(output)?;
    println!(
        "\n{} model (l2={}) to {}",
        "Saved".green(),
        classifier.selected_l2(),
        output.display()
    );
    Ok(())
}

fn cmd_classify(
    input: &Path,
    model: &Path,
    agency: Option<String>,
    date: Option<String>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (agency, date) = provenance(input, agency, date)?;
    let classifier = LineClassifier::load_path(model)?;
    let lines = extract_lines(input, &agency, &date)?;
    let labeled = classifier.classify(&lines)?;

    match output {
        Some(path) => {
            write_labeled_csv(&labeled, fs::File::create(path)?)?;
            println!(
                "{} {} lines to {}",
                "Classified".green(),
                labeled.len(),
                path.display()
            );
        }
        None => write_labeled_csv(&labeled, std::io::stdout().lock())?,
    }
    Ok(())
}

fn cmd_structure(
    input: &Path,
    agency: Option<String>,
    date: Option<String>,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let labeled = read_labeled_csv(fs::File::open(input)?)?;
    let (agency, date) = match (agency, date, labeled.first()) {
        (Some(a), Some(d), _) => (a, d),
        (a, d, Some(first)) => (
            a.unwrap_or_else(|| first.line.agency.clone()),
            d.unwrap_or_else(|| first.line.meeting_date.clone()),
        ),
        _ => return Err("empty table; pass --agency and --date".into()),
    };

    let (agenda, warnings) = build_agenda(&agency, &date, &labeled);
    for w in &warnings {
        eprintln!("{}: line {}: {}", "Warning".yellow(), w.line_index, w.message);
    }

    let format = if compact { JsonFormat::Compact } else { JsonFormat::Pretty };
    match output {
        Some(path) => {
            render::write_json(&agenda, path, format)?;
            println!("{} agenda to {}", "Saved".green(), path.display());
        }
        None => println!("{}", render::to_json(&agenda, format)?),
    }
    Ok(())
}

fn cmd_run(
    inputs: &[PathBuf],
    model: &Path,
    output: &Path,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let classifier = LineClassifier::load_path(model)?;
    let pipeline = AgendaPipeline::new(classifier);

    let mut requests = Vec::new();
    for input in inputs {
        let (agency, date) = provenance(input, None, None)?;
        requests.push(DocumentRequest {
            agency,
            meeting_date: date,
            path: input.clone(),
        });
    }

    fs::create_dir_all(output)?;
    let format = if compact { JsonFormat::Compact } else { JsonFormat::Pretty };

    let results = pipeline.run_batch(&requests);
    let mut failures = 0usize;
    for (req, result) in requests.iter().zip(results) {
        match result {
            Ok(out) => {
                for w in &out.warnings {
                    eprintln!(
                        "{}: {} {}: line {}: {}",
                        "Warning".yellow(),
                        req.agency,
                        req.meeting_date,
                        w.line_index,
                        w.message
                    );
                }
                let path = output.join(format!("{}_{}.json", req.agency, req.meeting_date));
                render::write_json(&out.agenda, &path, format)?;
                println!(
                    "{} {} ({} sections, {} items)",
                    "Wrote".green(),
                    path.display(),
                    out.agenda.section_count(),
                    out.agenda.item_count()
                );
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: {}: {}", "Failed".red(), req.path.display(), e);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} of {} documents failed", requests.len()).into());
    }
    Ok(())
}
