use clap::Parser;
use dotenv::dotenv;
use textgram::run_with_config_path;
use textgram::services::sender::SendMode;

/// textgram - renders typed text onto a colored canvas and delivers it to a
/// Telegram chat as a photo, a sticker, or a plain message
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Text to render and send
    #[arg(short, long)]
    text: String,

    /// Delivery kind
    #[arg(short, long, value_enum, default_value_t = SendMode::Photo)]
    send_as: SendMode,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from `.env` file into std::env (optional)
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    // Load config, init logging and run one send
    run_with_config_path(&args.config, &args.text, args.send_as).await
}
