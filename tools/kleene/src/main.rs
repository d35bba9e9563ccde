use std::ffi::OsStr;
use std::fs::File;
use std::io::BufWriter;
use std::io::stdout;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use itertools::Itertools;
use log::debug;
use log::info;

use kleene_automata::AutAutomaton;
use kleene_automata::Design;
use kleene_automata::StateIndex;
use kleene_automata::read_aut;
use kleene_automata::subset_construction;
use kleene_automata::write_aut;
use kleene_utilities::KleeneError;
use kleene_utilities::Timing;

use crate::verbosity::VerbosityFlag;

mod verbosity;

#[derive(clap::Parser, Debug)]
#[command(name = "kleene", about = "A command line tool for finite automata in the Aldebaran format")]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value_t = false,
        help = "Print the version of this tool"
    )]
    version: bool,

    #[command(flatten)]
    verbosity: VerbosityFlag,

    #[command(subcommand)]
    commands: Option<Commands>,

    #[arg(long, global = true)]
    timings: bool,
}

/// Defines the subcommands for this tool.
#[derive(Debug, Subcommand)]
enum Commands {
    Info(InfoArgs),
    Accepts(AcceptsArgs),
    Determinize(DeterminizeArgs),
}

#[derive(clap::Args, Debug)]
#[command(about = "Prints information related to the given automaton")]
struct InfoArgs {
    filename: String,

    #[arg(
        short,
        long,
        help = "List of labels that are considered epsilon, next to tau",
        value_delimiter = ','
    )]
    epsilon: Option<Vec<String>>,
}

#[derive(clap::Args, Debug)]
#[command(about = "Prints for every word whether the given automaton accepts it")]
struct AcceptsArgs {
    filename: String,

    words: Vec<String>,

    #[arg(short, long, help = "List of accept states", value_delimiter = ',')]
    accept: Vec<usize>,

    #[arg(long, help = "Determinize the automaton before reading the words")]
    determinize: bool,

    #[arg(
        short,
        long,
        help = "List of labels that are considered epsilon, next to tau",
        value_delimiter = ','
    )]
    epsilon: Option<Vec<String>>,
}

#[derive(clap::Args, Debug)]
#[command(about = "Determinizes the given automaton using the subset construction")]
struct DeterminizeArgs {
    filename: String,

    output: Option<String>,

    #[arg(short, long, help = "List of accept states", value_delimiter = ',')]
    accept: Vec<usize>,

    #[arg(
        short,
        long,
        help = "List of labels that are considered epsilon, next to tau",
        value_delimiter = ','
    )]
    epsilon: Option<Vec<String>>,
}

fn main() -> Result<ExitCode, KleeneError> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .parse_default_env()
        .init();

    if cli.version {
        eprintln!("kleene {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let timing = Timing::new();

    if let Some(command) = cli.commands {
        match command {
            Commands::Info(args) => {
                let automaton = read_automaton(&args.filename, args.epsilon, &timing)?;

                let rulebook = automaton.rulebook();
                let num_of_epsilon_rules = rulebook.rules().iter().filter(|rule| rule.symbol.is_epsilon()).count();
                println!("Number of states: {}", automaton.num_of_states());
                println!("Number of transitions: {}", automaton.num_of_transitions());
                println!("Number of epsilon transitions: {num_of_epsilon_rules}");
                println!("Alphabet: {{{}}}", rulebook.alphabet().iter().format(", "));

                let design = automaton.into_nfa_design(Vec::<StateIndex>::new());
                let mut timer = timing.start("determinize");
                let dfa_design = subset_construction(&design);
                timer.finish();

                println!("Number of determinized states: {}", dfa_design.states().len());
            }
            Commands::Accepts(args) => {
                let automaton = read_automaton(&args.filename, args.epsilon, &timing)?;
                let design = automaton.into_nfa_design(args.accept.into_iter().map(StateIndex::new));

                let design: Design<StateIndex> = if args.determinize {
                    let mut timer = timing.start("determinize");
                    let dfa_design = subset_construction(&design).relabel();
                    timer.finish();

                    info!("Determinized into {} states", dfa_design.states().len());
                    dfa_design.into()
                } else {
                    design.into()
                };

                let mut timer = timing.start("accepts");
                for word in &args.words {
                    let accepted = match design.accepts(word) {
                        Ok(accepted) => accepted,
                        Err(error) => {
                            // The determinized automaton has no rules for characters outside of the alphabet.
                            debug!("{error}");
                            false
                        }
                    };

                    println!("{word}: {}", if accepted { "accept" } else { "reject" });
                }
                timer.finish();
            }
            Commands::Determinize(args) => {
                let automaton = read_automaton(&args.filename, args.epsilon, &timing)?;
                let design = automaton.into_nfa_design(args.accept.into_iter().map(StateIndex::new));

                let mut timer = timing.start("determinize");
                let dfa_design = subset_construction(&design).relabel();
                timer.finish();

                // The format has no notion of accept states.
                eprintln!("Accept states: {}", dfa_design.accept_states().iter().format(","));

                if let Some(file) = args.output {
                    let mut writer = BufWriter::new(File::create(file)?);
                    write_aut(&mut writer, &dfa_design)?;
                } else {
                    write_aut(&mut stdout(), &dfa_design)?;
                }
            }
        }
    }

    if cli.timings {
        timing.print();
    }

    Ok(ExitCode::SUCCESS)
}

/// Reads the automaton from the given .aut file.
fn read_automaton(filename: &str, epsilon: Option<Vec<String>>, timing: &Timing) -> Result<AutAutomaton, KleeneError> {
    let path = Path::new(filename);
    if path.extension() != Some(OsStr::new("aut")) {
        return Err("Unsupported file format, expected an .aut file.".into());
    }

    let file = File::open(path)?;
    let mut timer = timing.start("read_aut");
    let automaton = read_aut(&file, epsilon.unwrap_or_default())?;
    timer.finish();

    Ok(automaton)
}
