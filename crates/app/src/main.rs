use feedback_app::{AppConfig, EventSystem};

/// Wires the event system from the environment and prints its routing table
/// (event type → handler count) as JSON.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    feedback_observability::init_with(&config.log);

    let system = EventSystem::new(&config)?;
    let routes = system.routing_table()?;

    tracing::info!(
        handler_sets = ?config.handler_sets,
        event_types = routes.len(),
        "event system ready"
    );
    println!("{}", serde_json::to_string_pretty(&routes)?);

    system.shutdown()?;
    Ok(())
}
