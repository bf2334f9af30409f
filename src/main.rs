fn main() {
    if let Err(err) = flow_layout::run() {
        eprintln!("{}", flow_layout::cli::report(&err));
        std::process::exit(1);
    }
}
