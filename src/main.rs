use std::process::ExitCode;

fn main() -> ExitCode {
    rendercheck::cli::run()
}
