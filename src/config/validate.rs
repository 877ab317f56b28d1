use anyhow::{Result, bail};

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }

    if cfg.database.connect_timeout_secs == 0 {
        errors.push("database.connect_timeout_secs must be > 0".to_string());
    }

    if cfg.database.max_connections == 0 {
        errors.push("database.max_connections must be > 0".to_string());
    }

    if cfg.database.min_idle > cfg.database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            cfg.database.min_idle, cfg.database.max_connections
        ));
    }

    if cfg.listing.max_page_size == 0 {
        errors.push("listing.max_page_size must be > 0".to_string());
    }

    // Page sizes are handed to the CQL driver as i32.
    if cfg.listing.max_page_size > i32::MAX as u64 {
        errors.push(format!(
            "listing.max_page_size must be <= {}",
            i32::MAX
        ));
    }

    if cfg.listing.default_page_size == 0 || cfg.listing.default_page_size > cfg.listing.max_page_size
    {
        errors.push(format!(
            "listing.default_page_size ({}) must be between 1 and listing.max_page_size ({})",
            cfg.listing.default_page_size, cfg.listing.max_page_size
        ));
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::config::AppConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_problem_into_one_message() {
        let mut cfg = AppConfig::default();
        cfg.general.host = " ".to_string();
        cfg.database.url = String::new();
        cfg.database.min_idle = 20;

        let message = validate(&cfg).expect_err("config should be invalid").to_string();

        assert!(message.contains("general.host"));
        assert!(message.contains("database.url"));
        assert!(message.contains("database.min_idle (20)"));
    }
}
