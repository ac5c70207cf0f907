//! Command-line checker: load a form definition, apply answers, report validation results.
use std::{path::PathBuf, process};

use clap::{Parser, Subcommand};
use logging as logshared;
use tracing::{debug, info};

mod answers;
mod definition;
mod report;


use crate::definition::FormDefinition;

#[derive(Parser, Debug)]
#[command(name = "survey-check", about = "Validate survey answers", version)]
/// Command-line interface for the `survey-check` binary.
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,

    /// Logging controls
    #[command(flatten)]
    log: logshared::LogArgs,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Load a form definition, apply answers and report every question.
    Check {
        /// Path to the form definition (.ron)
        #[arg(long, value_name = "PATH")]
        form: PathBuf,

        /// Path to a JSON object of answers
        #[arg(long, value_name = "PATH")]
        answers: Option<PathBuf>,

        /// Dump the stored answers as JSON to stdout after checking
        #[arg(long)]
        dump: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    cli.log.init();

    let Command::Check {
        form,
        answers: answers_path,
        dump,
    } = &cli.command;

    let definition = match FormDefinition::load(form) {
        Ok(definition) => definition,
        Err(e) => {
            eprintln!("{}", e.pretty());
            process::exit(2);
        }
    };
    let mut survey_form = match definition.build(Some(form.as_path())) {
        Ok(survey_form) => survey_form,
        Err(e) => {
            eprintln!("{}", e.pretty());
            process::exit(2);
        }
    };

    if let Some(path) = answers_path {
        match answers::load(path) {
            Ok(values) => survey_form.set_values(values),
            Err(e) => {
                eprintln!("{}", e.pretty());
                process::exit(2);
            }
        }
    }

    let reports = report::collect(&mut survey_form);
    for entry in &reports {
        println!("{entry}");
    }
    let failed = reports.iter().filter(|r| r.failed()).count();
    debug!(questions = reports.len(), failed, "check_finished");

    if *dump {
        match serde_json::to_string_pretty(&survey_form.survey().values()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize answers: {e}");
                process::exit(2);
            }
        }
    }

    if failed > 0 {
        info!(failed, "answers_invalid");
        process::exit(1);
    }
    println!("OK");
}
