use boccob::command_argument_builder;
use boccob::handlers::handle_crawl;

#[tokio::main]
async fn main() {
    let matches = match command_argument_builder().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            // --help and --version are not failures; everything else prints
            // usage and exits 1
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    std::process::exit(handle_crawl(&matches).await);
}
