use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use strokecast_io::{FEATURE_NAMES, StrokeReader, gender_code, smoking_code};
use strokecast_rf::{ConfusionMatrix, Dataset, RandomForest};

#[derive(Parser)]
#[command(name = "strokecast")]
#[command(about = "Stroke-risk prediction with a bagged decision-tree ensemble")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for shuffling and bootstrap sampling
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel tree training (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Shared data and training parameters.
#[derive(Args, Debug, Clone)]
struct TrainArgs {
    /// Path to the stroke dataset CSV file
    #[arg(long)]
    data: PathBuf,

    /// Number of records used for training (the rest form the test set)
    #[arg(long)]
    train_size: usize,

    /// Number of trees in the Random Forest
    #[arg(long, default_value_t = 100)]
    trees: usize,

    /// Maximum tree depth (defaults to the feature count)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Maximum number of usable CSV rows to load
    #[arg(long, default_value_t = 1000)]
    max_rows: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Train on a shuffled split and report holdout accuracy
    Evaluate {
        #[command(flatten)]
        train: TrainArgs,
    },

    /// Train, then predict the stroke risk for one patient
    Predict {
        #[command(flatten)]
        train: TrainArgs,

        /// Patient gender (Male/Female/Other)
        #[arg(long)]
        gender: String,

        /// Patient age in years
        #[arg(long)]
        age: f64,

        /// Hypertension (0 = no, 1 = yes)
        #[arg(long)]
        hypertension: f64,

        /// Heart disease (0 = no, 1 = yes)
        #[arg(long)]
        heart_disease: f64,

        /// Average blood glucose level
        #[arg(long)]
        avg_glucose: f64,

        /// Body mass index
        #[arg(long)]
        bmi: f64,

        /// Smoking status (never smoked/formerly smoked/smokes/Unknown)
        #[arg(long)]
        smoking: String,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct ConfusionOutput {
    true_negatives: usize,
    false_positives: usize,
    false_negatives: usize,
    true_positives: usize,
    precision: f64,
    recall: f64,
    f1: f64,
}

#[derive(Serialize)]
struct EvaluateOutput {
    n_rows: usize,
    n_skipped: usize,
    n_train: usize,
    n_test: usize,
    n_features: usize,
    feature_names: Vec<&'static str>,
    n_trees: usize,
    accuracy: f64,
    train_entropy: f64,
    test_entropy: f64,
    confusion: ConfusionOutput,
}

#[derive(Serialize)]
struct PredictOutput {
    risk: &'static str,
    prediction: u8,
    glucose_status: &'static str,
    bmi_status: &'static str,
    advisory: Option<&'static str>,
    test_accuracy: Option<f64>,
}

/// Load the CSV, clamp the train size, split, and train the forest.
fn load_and_train(
    args: &TrainArgs,
    seed: u64,
) -> Result<(RandomForest, Dataset, Dataset, usize)> {
    let loaded = StrokeReader::new(&args.data)
        .with_max_rows(Some(args.max_rows))
        .read()
        .context("failed to read stroke CSV")?;
    let dataset = loaded.dataset;
    info!(n_rows = dataset.len(), n_skipped = loaded.n_skipped, "dataset loaded");

    let mut train_size = args.train_size;
    if train_size > dataset.len() {
        warn!(
            requested = train_size,
            available = dataset.len(),
            "train size exceeds dataset size, using all records"
        );
        train_size = dataset.len();
    }

    let (train, test) = dataset.shuffled_split(train_size, seed)?;

    let mut forest = RandomForest::new(args.trees)?
        .with_seed(seed)
        .with_max_depth(args.max_depth);
    forest.train(&train).context("training failed")?;

    Ok((forest, train, test, loaded.n_skipped))
}

fn parse_gender(value: &str) -> Result<f64> {
    gender_code(value).ok_or_else(|| {
        anyhow::anyhow!("unknown gender: {value} (expected Male, Female, or Other)")
    })
}

fn parse_smoking(value: &str) -> Result<f64> {
    smoking_code(value).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown smoking status: {value} (expected never smoked, formerly smoked, smokes, or Unknown)"
        )
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Evaluate { train: args } => {
            let (forest, train, test, n_skipped) = load_and_train(&args, cli.seed)?;

            let accuracy = forest
                .evaluate(&test)
                .context("holdout evaluation failed")?;

            let mut truth = Vec::with_capacity(test.len());
            let mut predicted = Vec::with_capacity(test.len());
            for i in 0..test.len() {
                truth.push(test.label(i));
                predicted.push(forest.predict(test.features(i))?);
            }
            let confusion = ConfusionMatrix::from_labels(&truth, &predicted)?;

            info!(accuracy, "holdout evaluation complete");

            let output = EvaluateOutput {
                n_rows: train.len() + test.len(),
                n_skipped,
                n_train: train.len(),
                n_test: test.len(),
                n_features: train.n_features(),
                feature_names: FEATURE_NAMES.to_vec(),
                n_trees: forest.n_trees(),
                accuracy,
                train_entropy: train.label_entropy(),
                test_entropy: test.label_entropy(),
                confusion: ConfusionOutput {
                    true_negatives: confusion.true_negatives(),
                    false_positives: confusion.false_positives(),
                    false_negatives: confusion.false_negatives(),
                    true_positives: confusion.true_positives(),
                    precision: confusion.precision(),
                    recall: confusion.recall(),
                    f1: confusion.f1(),
                },
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Predict {
            train: args,
            gender,
            age,
            hypertension,
            heart_disease,
            avg_glucose,
            bmi,
            smoking,
        } => {
            let gender_value = parse_gender(&gender)?;
            let smoking_value = parse_smoking(&smoking)?;

            let (forest, _train, test, _) = load_and_train(&args, cli.seed)?;

            let test_accuracy = if test.is_empty() {
                None
            } else {
                Some(forest.evaluate(&test).context("holdout evaluation failed")?)
            };

            let patient = [
                gender_value,
                age,
                hypertension,
                heart_disease,
                avg_glucose,
                bmi,
                smoking_value,
            ];
            let prediction = forest.predict(&patient)?;
            info!(prediction, "patient risk predicted");

            let output = PredictOutput {
                risk: if prediction == 1 { "high" } else { "low" },
                prediction,
                glucose_status: if avg_glucose > 140.0 { "abnormal" } else { "normal" },
                bmi_status: if (18.5..=24.9).contains(&bmi) { "normal" } else { "abnormal" },
                advisory: (prediction == 1).then_some("seek advice from a medical professional"),
                test_accuracy,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
