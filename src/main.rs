#[tokio::main]
async fn main() {
    if let Err(error) = reviewer_lib::run().await {
        eprintln!("Reviewer API failed: {}", error);
        std::process::exit(1);
    }
}
