//! Configuration inspection command.
//!
//! Loads the configuration exactly the way the service does and prints
//! the resolved values, so a deploy can be checked without starting the
//! server. Secrets print as present or absent, never as their value.

use forneria_assistant::config::{AssistantConfig, ConfigError};

/// Load the configuration from the environment and print it.
pub fn run() -> Result<(), ConfigError> {
    let config = AssistantConfig::from_env()?;

    println!("bind address:    {}", config.socket_addr());
    println!("restaurant api:  {}", config.restaurant.base_url);
    println!("nominatim:       {}", config.geocode.nominatim_url);
    println!("viacep:          {}", config.geocode.viacep_url);
    println!("region hint:     {}", config.geocode.region_hint);
    println!("delivery radius: {} km", config.delivery.radius_km);
    println!(
        "delivery fee:    {} + {} por km",
        config.delivery.fee_base.display_brl(),
        config.delivery.fee_per_km.display_brl()
    );
    println!("profile dir:     {}", config.profile_dir.display());
    match &config.knowledge_file {
        Some(path) => println!("knowledge file:  {}", path.display()),
        None => println!("knowledge file:  (built-in answers only)"),
    }
    println!("lookup timeout:  {:?}", config.lookup_timeout);
    println!("session idle:    {:?}", config.session_idle);
    println!("utc offset:      {:+}h", config.utc_offset_hours);
    println!(
        "sentry:          {}",
        if config.sentry_dsn.is_some() {
            "configured"
        } else {
            "disabled"
        }
    );

    Ok(())
}
