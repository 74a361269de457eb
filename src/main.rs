use bodylog::commands::Cli;
use bodylog::msg_error;

#[tokio::main]
async fn main() {
    if let Err(err) = Cli::menu().await {
        msg_error!(err);
        std::process::exit(1);
    }
}
