// Command-line front end for the record OCR pipeline

use clap::Parser;
use log::{error, info};
use parish_ocr::{
    models::{Language, Line, RecordType, ValidationIssueType},
    processing::OcrLineReader,
    OcrError, PipelineOutput, RecordPipeline,
};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "parish-ocr",
    version,
    about = "Extract sacramental record fields from OCR output"
)]
struct Cli {
    /// OCR output file, or "-" for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    #[arg(long, default_value = "baptism")]
    record_type: RecordType,

    #[arg(long, default_value = "auto")]
    language: Language,

    /// Input is a JSON array of OCR lines rather than plain text
    #[arg(long, default_value_t = false)]
    json_lines: bool,

    /// Print the mapping result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn read_lines(cli: &Cli) -> Result<Vec<Line>, OcrError> {
    if cli.input.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        OcrLineReader::from_content(&content, cli.json_lines)
    } else {
        OcrLineReader::from_file(&cli.input, cli.json_lines)
    }
}

// Function to print a detailed extraction report
fn print_detailed_report(output: &PipelineOutput, record_type: RecordType) {
    let mapping = &output.mapping;

    println!("\n===============================================");
    println!("      {} RECORD EXTRACTION REPORT", record_type.as_str().to_uppercase());
    println!("===============================================\n");

    println!("NORMALIZED LINES:");
    for line in &output.normalized_lines {
        println!("  [{:?}] {}", line.source_indices(), line.text);
    }

    if let Some(language) = mapping.extracted.debug.language_detected {
        println!("\nDetected language: {}", language);
    }

    println!("\nEXTRACTED FIELDS:");
    for (key, field) in &mapping.extracted.fields {
        println!(
            "  {}: {} (anchor \"{}\", {}, confidence {:.2}, lines {:?})",
            key,
            field.raw_value,
            field.matched_anchor,
            field.anchor_language,
            field.confidence,
            field.source_line_indices
        );
    }

    println!("\nFORM FIELDS:");
    for (key, field) in &mapping.form_patch {
        println!("  {}: {} ({:.2})", key, field.value, field.confidence);
        println!("      {}", field.reason);
    }
    println!("  Mapping confidence: {:.2}", mapping.mapping_confidence);

    if !output.review.issues.is_empty() {
        println!("\nNEEDS REVIEW:");
        for issue in &output.review.issues {
            println!(
                "  - [{}] {}",
                match issue.issue_type {
                    ValidationIssueType::MissingField => "MISSING",
                    ValidationIssueType::UnparsedDate => "DATE",
                },
                issue.message
            );
        }
    }

    println!(
        "\nRecord result: {}",
        if output.review.is_complete {
            "COMPLETE"
        } else {
            "INCOMPLETE"
        }
    );
}

fn run(cli: &Cli) -> Result<(), OcrError> {
    let lines = read_lines(cli)?;
    info!("read {} OCR lines", lines.len());

    let pipeline = RecordPipeline::new(cli.record_type).with_language(cli.language);
    info!(
        "running {} pipeline (language: {})",
        pipeline.record_type(),
        pipeline.language()
    );
    let output = pipeline.run(&lines);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output.mapping)?);
    } else {
        print_detailed_report(&output, cli.record_type);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        error!("{}", err);
        std::process::exit(1);
    }
}
