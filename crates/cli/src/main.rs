use tracing_subscriber::EnvFilter;

fn main() {
    let filter =
        EnvFilter::try_from_env("PDF_ANNOTATOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Err(error) = pdf_annotator_cli::run(std::env::args_os()) {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}
