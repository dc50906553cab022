use super::commands::ConfigAction;
use anyhow::Context;
use sub_recoded_proxy::ProxyConfig;

pub fn handle_config(config: &ProxyConfig, action: Option<ConfigAction>) -> anyhow::Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            print!("{}", config.to_toml()?);
        }
        Some(ConfigAction::Validate) => {
            // Loading already validated; report what would be served.
            println!("\x1b[38;5;46m[+]\x1b[0m Configuration is valid");
            println!("    listen  {}", config.listen_addr());
            println!("    scheme  {}", config.server.public_scheme);
            println!("    timeout {}s", config.fetch.timeout_secs);
        }
        Some(ConfigAction::Save { path }) => {
            config
                .save(&path)
                .with_context(|| format!("Failed to save configuration to {:?}", path))?;
            println!("\x1b[38;5;46m[+]\x1b[0m Configuration written to {:?}", path);
        }
    }
    Ok(())
}
