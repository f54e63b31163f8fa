mod demo_app;

use std::io::{self, IsTerminal, Read};

use querent::{DEFAULT_QUERY_LANG, install};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let app = match install(&demo_app::DemoApp) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let mut produced = 0usize;
    if config.all {
        for answer in app.get_all_with(&config.question, &config.lang) {
            println!("{}\n", answer.query);
            produced += 1;
        }
    } else if let Some(answer) = app.get_first_with(&config.question, &config.lang) {
        println!("{}", answer.query);
        produced += 1;
    }

    if produced == 0 {
        eprintln!("no query generated for: {:?}", config.question);
        std::process::exit(1);
    }
}

struct CliConfig {
    question: String,
    lang: String,
    all: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut question: Option<String> = None;
    let mut lang = DEFAULT_QUERY_LANG.to_string();
    let mut all = false;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("querent {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--all" => all = true,
            "--lang" => {
                lang = args.next().ok_or_else(|| "error: --lang expects a value".to_string())?;
            }
            "--question" | "-q" => {
                let value =
                    args.next().ok_or_else(|| "error: --question expects a value".to_string())?;
                if question.is_some() {
                    return Err("error: question provided multiple times".to_string());
                }
                question = Some(value);
            }
            other if !other.starts_with('-') && question.is_none() => {
                question = Some(other.to_string());
            }
            other => return Err(format!("error: unrecognized argument {other:?}")),
        }
    }

    let question = match question {
        Some(question) => question,
        None if !io::stdin().is_terminal() => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| format!("error: cannot read stdin: {err}"))?;
            let trimmed = buf.trim().to_string();
            if trimmed.is_empty() {
                return Err("error: no question provided".to_string());
            }
            trimmed
        }
        None => return Err("error: no question provided (try --help)".to_string()),
    };

    Ok(CliConfig { question, lang, all })
}

fn print_help() {
    println!(
        "querent — turn a natural-language question into a structured query

USAGE:
    querent [OPTIONS] [QUESTION]

OPTIONS:
    -q, --question <TEXT>   The question to compile (or pass it positionally / on stdin)
        --lang <LANG>       Target query language [default: {DEFAULT_QUERY_LANG}]
        --all               Print every matching rule's query, not just the first
    -h, --help              Print help
    -V, --version           Print version

Diagnostics are controlled with RUST_LOG, e.g. RUST_LOG=querent=debug."
    );
}
