use std::fmt;
use std::io::{self, BufRead, Write};

use services::{CollectorConfig, SubmissionService, TrainerSession};
use trainer_core::{Catalog, Verdict};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ArgsError {}

struct Args {
    config: CollectorConfig,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut config = CollectorConfig::from_env();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-base" => {
                    let value = args
                        .next()
                        .ok_or(ArgsError::MissingValue { flag: "--api-base" })?;
                    config = CollectorConfig::new(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { config })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api-base <url>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRAINER_API_BASE_URL");
    eprintln!();
    eprintln!("Editor commands (everything else is collected as code):");
    eprintln!("  :run            execute the buffer against the active exercise");
    eprintln!("  :reset          clear the code buffer");
    eprintln!("  :hint           show the active exercise hint");
    eprintln!("  :next / :prev   navigate between exercises");
    eprintln!("  :goto <n>       jump to exercise number <n>");
    eprintln!("  :list           list all exercises with completion marks");
    eprintln!("  :score          show the current score");
    eprintln!("  :submit <name>  submit the score snapshot");
    eprintln!("  :quit           exit");
}

fn print_exercise(session: &TrainerSession) {
    let exercise = session.active_exercise();
    let done = if session.is_completed(session.active_index()) {
        " [done]"
    } else {
        ""
    };
    println!();
    println!("Exercise {}: {}{done}", exercise.id(), exercise.title());
    println!("{}", exercise.description());
}

fn print_list(session: &TrainerSession) {
    for (index, exercise) in session.catalog().iter().enumerate() {
        let mark = if session.is_completed(index) { "x" } else { " " };
        let active = if index == session.active_index() { ">" } else { " " };
        println!("{active} [{mark}] {}. {}", exercise.id(), exercise.title());
    }
}

fn print_run(session: &TrainerSession) {
    if !session.output().is_empty() {
        println!("{}", session.output());
    }
    match session.verdict() {
        Verdict::Correct => println!("-- correct ({}/{})", session.score(), session.total()),
        Verdict::Incorrect => println!("-- not quite right"),
        Verdict::Pending => {}
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut session = TrainerSession::new(Catalog::builtin());
    let submission = SubmissionService::new(args.config);
    let mut buffer: Vec<String> = Vec::new();

    print_exercise(&session);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);

        let Some(command) = line.strip_prefix(':') else {
            buffer.push(line.to_owned());
            continue;
        };

        let (command, rest) = command
            .split_once(' ')
            .map_or((command, ""), |(c, r)| (c, r.trim()));

        match command {
            "run" => {
                session.run_active(&buffer.join("\n"));
                print_run(&session);
            }
            "reset" => buffer.clear(),
            "hint" => println!("Hint: {}", session.active_exercise().hint()),
            "next" => match session.advance() {
                Ok(()) => {
                    buffer.clear();
                    print_exercise(&session);
                }
                Err(err) => println!("{err}"),
            },
            "prev" => match session.retreat() {
                Ok(()) => {
                    buffer.clear();
                    print_exercise(&session);
                }
                Err(err) => println!("{err}"),
            },
            "goto" => match rest.parse::<usize>() {
                Ok(number) if number >= 1 => match session.select(number - 1) {
                    Ok(()) => {
                        buffer.clear();
                        print_exercise(&session);
                    }
                    Err(err) => println!("{err}"),
                },
                _ => println!(":goto expects an exercise number"),
            },
            "list" => print_list(&session),
            "score" => {
                let progress = session.progress();
                println!("{}/{} completed", progress.completed, progress.total);
            }
            "submit" => match submission.submit(rest, &session).await {
                Ok(receipt) => {
                    println!(
                        "submitted {}/{}: {}",
                        session.score(),
                        session.total(),
                        receipt.message.as_deref().unwrap_or("accepted"),
                    );
                }
                Err(err) => println!("submission failed: {err}"),
            },
            "quit" | "q" => break,
            "help" => print_usage(),
            other => println!("unknown command :{other} (try :help)"),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
