use clap::{CommandFactory, Parser};

use check_ups::check::RESOURCE_NAME;
use check_ups::cli::Cli;
use check_ups::config_generator::print_icinga_command_config;
use check_ups::{evaluate, CheckError, CheckRequest, Runner, SnmpQuery, State};

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .target(env_logger::Target::Stderr)
        .init();

    if cli.print_icinga_command {
        if let Err(e) = print_icinga_command_config("check-ups", &Cli::command()) {
            eprintln!("{}", e);
            std::process::exit(State::Unknown.exit_code());
        }
        std::process::exit(State::Ok.exit_code());
    }

    let request = CheckRequest::from_options(cli.options()).unwrap_or_else(|e| e.print_and_exit());

    let mut runner = Runner::new().with_name(RESOURCE_NAME);
    if cli.unknown_on_error {
        runner = runner.on_error(|_: &CheckError| State::Unknown);
    }

    runner
        .safe_run(|| {
            let mut ups = SnmpQuery::connect(&request)?;
            evaluate(&request, &mut ups)
        })
        .print_and_exit()
}
