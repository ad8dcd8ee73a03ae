fn main() {
    if let Err(err) = flow_workflows::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
