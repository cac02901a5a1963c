use newsletter_publisher::configuration::get_configuration;
use newsletter_publisher::startup::Application;
use newsletter_publisher::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        "newsletter-publisher".into(),
        "info".into(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    let settings = get_configuration()?;
    let application = Application::build(settings)?;
    tracing::info!("Listening on port {}", application.port());
    application.run_until_stopped().await?;
    Ok(())
}
