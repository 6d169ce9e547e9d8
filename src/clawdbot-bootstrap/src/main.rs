use std::process::ExitCode;

fn main() -> ExitCode {
    bootstrap_cli::main()
}
