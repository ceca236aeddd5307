use clap::Parser;
use cli::{Args, RunCmd};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(name = "qkit", version, about = "Documentation and test-quality tooling")]
pub struct Qkit {
    #[clap(flatten)]
    pub args: Args,

    #[clap(subcommand)]
    pub cmd: RunCmd,
}

fn main() -> ExitCode {
    let qkit = Qkit::parse();

    match qkit.cmd.run(qkit.args) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            eprintln!("error: {e:?}");
            ExitCode::FAILURE
        }
    }
}
