use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use turnstile::{
    audio, detect_issues, parse_transcribe_file, resolve_speaker_identities, segment,
    unnamed_speaker_clips, CsvWriter, DetectorOptions, ReviewReporter, SegmenterConfig,
};

#[derive(Parser)]
#[command(name = "turnstile")]
#[command(author, version, about = "Speaker-turn segmentation and misalignment review", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a transcript into a reviewed CSV
    Process {
        /// Input transcript file (Amazon Transcribe JSON format)
        #[arg(short, long)]
        transcript: PathBuf,

        /// Source audio file; enables per-speaker clip extraction
        #[arg(short, long)]
        audio: Option<PathBuf>,

        /// Directory for the CSV and speaker clips
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Same-speaker silence (seconds) that forces a new turn
        #[arg(long, default_value = "1.0")]
        silence_threshold: f64,

        /// Inter-token gap (seconds) the pause detector flags
        #[arg(long, default_value = "1.5")]
        time_gap_threshold: f64,

        /// Mean confidence below which a row is listed for review
        #[arg(long, default_value = "0.75")]
        review_threshold: f64,

        /// Skip speaker audio extraction even when --audio is given
        #[arg(long)]
        skip_extraction: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze a transcript without writing anything
    Analyze {
        /// Input transcript file (Amazon Transcribe JSON format)
        #[arg(short, long)]
        transcript: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            transcript,
            audio,
            output_dir,
            silence_threshold,
            time_gap_threshold,
            review_threshold,
            skip_extraction,
            verbose,
        } => {
            setup_logging(verbose);
            process_transcript(
                transcript,
                audio,
                output_dir,
                silence_threshold,
                time_gap_threshold,
                review_threshold,
                skip_extraction,
            )
            .await
        }
        Commands::Analyze {
            transcript,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_transcript(transcript)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn process_transcript(
    transcript: PathBuf,
    audio_path: Option<PathBuf>,
    output_dir: PathBuf,
    silence_threshold: f64,
    time_gap_threshold: f64,
    review_threshold: f64,
    skip_extraction: bool,
) -> Result<()> {
    info!("Loading transcript from {:?}", transcript);
    let response =
        parse_transcribe_file(&transcript).context("Failed to parse input transcript")?;

    if !output_dir.is_dir() {
        bail!("Output directory {:?} does not exist", output_dir);
    }

    // Step 1: extract per-speaker clips, unless they already exist or the
    // user opted out
    if let Some(audio_path) = audio_path {
        if !audio_path.exists() {
            bail!("Audio file {:?} not found", audio_path);
        }
        let already_identified = !resolve_speaker_identities(&output_dir)?.is_empty();
        if skip_extraction || already_identified {
            info!("Skipping speaker audio extraction");
        } else {
            audio::verify_ffmpeg().await?;
            let summary =
                audio::extract_speaker_audio(&response, &audio_path, &output_dir).await?;
            info!(
                clips = summary.clips.len(),
                failures = summary.failures,
                "speaker audio extraction finished"
            );
        }
    }

    // Step 2: resolve identities from renamed clips
    let identities = resolve_speaker_identities(&output_dir)?;
    let unnamed = unnamed_speaker_clips(&output_dir)?;
    if !unnamed.is_empty() {
        warn!(
            count = unnamed.len(),
            "unnamed speaker clips present; rename them spk_<n>_<name>.m4a to bind identities"
        );
    }
    info!(identities = identities.len(), "resolved speaker identities");

    // Step 3: segment into rows
    let tokens = response.tokens();
    let config = SegmenterConfig {
        silence_threshold,
        time_gap_threshold,
    };
    let rows = segment(&tokens, &identities, &config);
    info!(tokens = tokens.len(), rows = rows.len(), "segmentation complete");

    // Step 4: flag misalignments
    let issues = detect_issues(&rows, DetectorOptions::default())?;
    if issues.is_empty() {
        info!("No misalignment issues detected");
    } else {
        info!(issues = issues.len(), "misalignment issues detected");
        for issue in &issues {
            println!(
                "Row {}: {} - {}",
                issue.row_id, issue.issue_type, issue.description
            );
        }
    }

    // Step 5: write the CSV
    let base_name = transcript
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("transcript");
    let writer = CsvWriter::new(&output_dir);
    let csv_path = writer.write_transcript(&rows, base_name)?;
    info!("Transcript written to {:?}", csv_path);

    // Step 6: list segments needing a human pass
    let reporter = ReviewReporter::new(review_threshold);
    print!("{}", reporter.report(&rows));

    Ok(())
}

fn analyze_transcript(transcript: PathBuf) -> Result<()> {
    info!("Analyzing transcript from {:?}", transcript);
    let response =
        parse_transcribe_file(&transcript).context("Failed to parse input transcript")?;

    let tokens = response.tokens();
    let rows = segment(&tokens, &HashMap::new(), &SegmenterConfig::default());
    let issues = detect_issues(&rows, DetectorOptions::default())?;

    println!("Transcript Analysis");
    println!("==================");
    println!("Total tokens: {}", tokens.len());
    println!("Reported speakers: {}", response.speaker_count());
    println!("Rows: {}", rows.len());
    println!();

    println!("Issues");
    println!("------");
    if issues.is_empty() {
        println!("none");
    } else {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for issue in &issues {
            *counts.entry(issue.issue_type.as_str()).or_insert(0) += 1;
        }
        let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
        counts.sort();
        for (issue_type, count) in counts {
            println!("{issue_type}: {count}");
        }
    }
    println!();

    print!("{}", ReviewReporter::default().report(&rows));
    Ok(())
}
