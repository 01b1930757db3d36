use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use scribe_core::AlertConfig;
use scribe_engine::{analyze_note, join_turns, templates};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod report;

const DEFAULT_LOG_FILTER: &str = "scribe_cli=info,scribe_engine=info";

#[derive(Parser, Debug)]
#[command(
    name = "scribe-cli",
    about = "Trích xuất ghi chú lâm sàng có cấu trúc và cảnh báo an toàn từ lời đọc."
)]
struct Args {
    /// File lời đọc; lặp lại để ghép nhiều lượt.
    #[arg(short, long)]
    input: Vec<PathBuf>,

    /// Lời đọc truyền trực tiếp; lặp lại để ghép nhiều lượt.
    #[arg(short, long)]
    note: Vec<String>,

    /// Dùng một mẫu ghi chú có sẵn làm lượt đầu tiên.
    #[arg(long)]
    template: Option<String>,

    /// File JSON cấu hình ngưỡng cảnh báo.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Liệt kê các mẫu ghi chú rồi thoát.
    #[arg(long)]
    list_templates: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.list_templates {
        for template in templates::all() {
            println!("{:<16} {:<16} {}", template.id, template.name, template.description);
        }
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Không đọc được file cấu hình {:?}", path))?;
            AlertConfig::from_json_str(&raw)
                .with_context(|| format!("Cấu hình không hợp lệ trong {:?}", path))?
        }
        None => AlertConfig::default(),
    };

    let turns = collect_turns(&args)?;
    let history = join_turns(&turns);
    let analysis = analyze_note(&history, &config);

    info!(
        turns = turns.len(),
        extracted = analysis.record.is_some(),
        alerts = analysis.alerts.len(),
        "note analyzed"
    );

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        OutputFormat::Text => {
            let today = chrono::Local::now().date_naive();
            print!("{}", report::render(&analysis, today));
        }
    }

    Ok(())
}

fn collect_turns(args: &Args) -> anyhow::Result<Vec<String>> {
    let mut turns = Vec::new();

    if let Some(id) = &args.template {
        let template = templates::find(id)
            .with_context(|| format!("Không có mẫu ghi chú {id:?}; xem --list-templates"))?;
        turns.push(template.text.to_string());
    }

    for path in &args.input {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Không đọc được file {:?}", path))?;
        turns.push(text);
    }

    turns.extend(args.note.iter().cloned());

    if turns.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Không đọc được stdin")?;
        turns.push(text);
    }

    Ok(turns)
}
