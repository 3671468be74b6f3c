pub mod blog;
pub mod chat_client;
pub mod config;
pub mod domain;
pub mod email_client;
pub mod mailchimp_client;
pub mod newsletter;
pub mod routes;
pub mod startup;
pub mod storage;
pub mod telemetry;

/// Debug output for error enums: the error followed by its source chain.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
