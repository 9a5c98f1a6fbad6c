use anyhow::{Context, Result};
use automata::tm::{Configuration, TuringMachine};
use automata::{Automaton, AutomatonKind, Outcome, RuleLoader, SampleManager, DEFAULT_STEP_LIMIT};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The kind of automaton: dfa, nfa, pda or tm
    #[clap(required_unless_present = "list")]
    kind: Option<AutomatonKind>,

    /// The rules file describing the automaton
    #[clap(short, long, conflicts_with = "sample")]
    rules: Option<PathBuf>,

    /// Use an embedded sample instead of a rules file
    #[clap(short, long)]
    sample: Option<String>,

    /// The string to decide; prompted for when omitted
    #[clap(short, long)]
    input: Option<String>,

    /// The maximum number of Turing machine steps
    #[clap(long, default_value_t = DEFAULT_STEP_LIMIT)]
    step_limit: usize,

    /// Print each step of a Turing machine run
    #[clap(short = 'd', long)]
    debug: bool,

    /// List the embedded samples and exit
    #[clap(short, long)]
    list: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list {
        for name in SampleManager::list_sample_names() {
            let sample = SampleManager::get_sample_by_name(&name)?;
            println!(
                "{:<28} {:<16} {}",
                sample.name,
                sample.kind.label(),
                sample.description
            );
        }
        return Ok(());
    }

    let kind = cli.kind.context("an automaton kind is required")?;
    let automaton = load(kind, &cli)?;
    if automaton.kind() != kind {
        anyhow::bail!("sample is a {}, not a {}", automaton.kind(), kind);
    }

    let input = match cli.input {
        Some(input) => input,
        None => prompt("Input your input string: ")?,
    };

    let outcome = match &automaton {
        Automaton::Tm(machine) if cli.debug => trace_run(machine, &input, cli.step_limit),
        _ => automaton.run(&input, cli.step_limit),
    };

    println!(
        "The string \"{}\" parsed through the {} emulator returns: {}",
        input, kind, outcome
    );

    Ok(())
}

fn load(kind: AutomatonKind, cli: &Cli) -> Result<Automaton> {
    if let Some(name) = &cli.sample {
        return SampleManager::build(name)
            .with_context(|| format!("failed to build sample '{}'", name));
    }

    let path = match &cli.rules {
        Some(path) => path.clone(),
        None => PathBuf::from(prompt("Input your rule filename: ")?),
    };

    RuleLoader::load(kind, &path)
        .with_context(|| format!("failed to load {} rules from {}", kind, path.display()))
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Runs `machine` like `TuringMachine::simulate`, printing every configuration.
fn trace_run(machine: &TuringMachine, input: &str, step_limit: usize) -> Outcome {
    let outcome = machine.simulate_with(input, step_limit, print_state);
    println!();

    outcome
}

fn print_state(config: &Configuration<'_>) {
    println!(
        "Step: {}, State: {}, Tape: {}, Head: {}",
        config.step_count(),
        config.state(),
        config.tape().contents(),
        config.head()
    );
}
