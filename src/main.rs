use clap::Parser;

mod commands;
mod output;

use commands::replace;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "batch-replace")]
#[command(version = VERSION)]
#[command(about = "Replace mapped values with their keys in file contents, file names, and directory names")]
struct Cli {
    #[command(flatten)]
    args: replace::ReplaceArgs,
}

fn main() -> std::process::ExitCode {
    // clap exits with a usage error (status 2) on wrong arity
    let cli = Cli::parse();

    let (json_result, exit_code) = output::map_cmd_result_to_json(replace::run(cli.args));

    if let Err(err) = output::print_json_result(json_result) {
        eprintln!("{}", err);
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
