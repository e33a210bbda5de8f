#[tokio::main]
async fn main() {
    if let Err(e) = screenview_lib::run().await {
        eprintln!("screenview: {}", e);
        std::process::exit(1);
    }
}
