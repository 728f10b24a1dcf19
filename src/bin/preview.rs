use std::io::Write;
use std::{env, fs::OpenOptions};

use anyhow::Context;
use gapfill::{load_passage, logging, EngineConfig, Session, Status};
use serde::Serialize;
use tracing::{debug, info};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const USAGE: &str = "Usage: gapfill-preview <passage-file> [--out <html-file>] [--json] [--verbose]";

pub struct Config {
    pub passage_path: String,
    pub output_path: Option<String>,
    pub json: bool,
    pub verbose: bool,
}

fn parse_config(mut args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let mut passage_path = None;
    let mut output_path = None;
    let mut json = false;
    let mut verbose = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" | "-o" => {
                output_path = Some(args.next().context("--out needs a file path")?);
            }
            "--json" => json = true,
            "--verbose" | "-v" => verbose = true,
            flag if flag.starts_with('-') => anyhow::bail!("unknown flag '{}'", flag),
            _ if passage_path.is_none() => passage_path = Some(arg),
            _ => anyhow::bail!("unexpected argument '{}'", arg),
        }
    }

    Ok(Config {
        passage_path: passage_path.context("passage file is required")?,
        output_path,
        json,
        verbose,
    })
}

#[derive(Serialize)]
struct Report<'a> {
    title: Option<&'a str>,
    #[serde(flatten)]
    status: Status,
    bindings: Vec<gapfill::blanks::Binding<'a>>,
    unanswered: Vec<u32>,
    stale_answers: Vec<u32>,
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = match parse_config(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", USAGE);
            return Err(e);
        }
    };

    logging::init(config.verbose);

    let engine = EngineConfig::from_env();
    debug!(?engine, "engine configuration");

    let passage = load_passage(&config.passage_path)
        .context(format!("failed to load passage {}", config.passage_path))?;
    let mut session = Session::new(passage, &engine);

    let status = session.status();
    let unanswered = session.unanswered();
    let stale_answers = session.stale_answers();
    let preview = session.preview();

    if config.json {
        print_json(&mut session, status, unanswered, stale_answers)?;
    } else {
        print_summary(&mut session, status, &stale_answers);
    }

    if let Some(output_path) = &config.output_path {
        write_preview(output_path, &preview).context("failed to write preview")?;
        info!(path = %output_path, "preview written");
    }

    Ok(())
}

fn print_json(
    session: &mut Session,
    status: Status,
    unanswered: Vec<u32>,
    stale_answers: Vec<u32>,
) -> anyhow::Result<()> {
    let title = session.passage().title.clone();
    let report = Report {
        title: title.as_deref(),
        status,
        bindings: session.bindings(),
        unanswered,
        stale_answers,
    };

    let content = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{}", content);
    Ok(())
}

fn print_summary(session: &mut Session, status: Status, stale_answers: &[u32]) {
    if let Some(title) = &session.passage().title {
        println!("{BOLD}{}{RESET}\n", title);
    }

    match status {
        Status::NoBlanks => {
            println!("no blanks found yet, add markers such as (1), 1___ or ___ to the text");
            return;
        }
        Status::Blanks { total, answered } => {
            println!("{BOLD}{}{RESET} blanks, {BOLD}{}{RESET} answered\n", total, answered);
        }
    }

    for binding in session.bindings() {
        let answer = binding.answer.map_or("-", |a| a.raw_answer.as_str());
        println!(
            "  {:>4}  {:<12} {}",
            binding.marker.question_number, binding.marker.matched_text, answer
        );
    }

    if !stale_answers.is_empty() {
        println!("\nanswers kept for missing blanks: {:?}", stale_answers);
    }
}

fn write_preview(output_path: &str, preview: &str) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(output_path)
        .context(format!("failed to open {}", output_path))?;

    write!(file, "{}", preview).context("failed to write preview html")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_flags_in_any_order() {
        let config = parse_config(args(&["--json", "p.md", "--out", "p.html", "-v"])).unwrap();
        assert_eq!(config.passage_path, "p.md");
        assert_eq!(config.output_path.as_deref(), Some("p.html"));
        assert!(config.json);
        assert!(config.verbose);
    }

    #[test]
    fn passage_path_is_required() {
        assert!(parse_config(args(&["--json"])).is_err());
        assert!(parse_config(args(&["a.md", "b.md"])).is_err());
        assert!(parse_config(args(&["a.md", "--out"])).is_err());
        assert!(parse_config(args(&["a.md", "--wat"])).is_err());
    }
}
