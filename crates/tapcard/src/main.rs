use tapcard::app::{App, parse_db_command};
use tapcard::{Config, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    logging::init_from_config(&config);

    let args: Vec<String> = std::env::args().collect();
    if let Some(command) = parse_db_command(&args) {
        return App::run_db_command(&config, command).await;
    }

    let app = App::with_config(config).await?;
    app.run().await
}
