fn main() {
    if let Err(e) = querybench_cli::run() {
        eprintln!("Error: {e:#}");
        // Workers of an aborted run may still be blocked on the database
        std::process::exit(1);
    }
}
