fn main() {
    if let Err(err) = census_explorer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
