use portfolio_site::config::get_configuration;
use portfolio_site::startup::{Application, StartupError};
use portfolio_site::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let subscriber = get_subscriber(
        String::from("portfolio_site"),
        String::from("info"),
        std::io::stdout,
    );

    init_subscriber(subscriber);

    let config = get_configuration()?;

    let application = Application::build(config).await?;
    application.run_until_stop().await?;

    Ok(())
}
