fn main() {
    if let Err(err) = csv_tate::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
