use clap::Parser;

fn main() {
    let cli = phpwrap::Cli::parse();
    phpwrap::init_logging(cli.verbose);
    let exit_code = match phpwrap::run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            2
        }
    };
    std::process::exit(exit_code);
}
