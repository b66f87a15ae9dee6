use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use strudelize_converter::{ConversionJob, ConversionPipeline, DirectorySeparator, DisabledSeparator};
use strudelize_domain::{CodeExporter, ExportFormat, JsonExporter, ResultExporter, StrudelResult};

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert an audio file into Strudel pattern code", long_about = None)]
struct Cli {
    /// Path to the audio or video file to convert
    input: String,
    /// Directory holding pre-separated stem WAVs, one <label>.wav per stem
    #[arg(long)]
    stems_dir: Option<PathBuf>,
    /// Print the full result as JSON instead of bare pattern code
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let job = ConversionJob {
        input_path: cli.input,
    };
    let result = match cli.stems_dir {
        Some(dir) => ConversionPipeline::new(DirectorySeparator::new(dir)).convert(&job)?,
        None => ConversionPipeline::new(DisabledSeparator).convert(&job)?,
    };

    print_result(&result, cli.json)?;
    Ok(())
}

fn print_result(result: &StrudelResult, json: bool) -> anyhow::Result<()> {
    let bytes = if json {
        JsonExporter.export(result, ExportFormat::Json)?
    } else {
        CodeExporter.export(result, ExportFormat::Code)?
    };
    println!("{}", String::from_utf8_lossy(&bytes));
    if !json {
        if let Some(path) = &result.preview_path {
            eprintln!("preview: {}", path.display());
        }
    }
    Ok(())
}
