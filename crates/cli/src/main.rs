use std::process::ExitCode;

fn main() -> ExitCode {
    ridematch_cli::run()
}
