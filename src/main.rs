mod cli;

fn main() {
    env_logger::init();

    if let Err(error) = cli::entrypoint() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
