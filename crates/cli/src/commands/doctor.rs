//! `chatrelay doctor` — Diagnose configuration and provider health.

use chatrelay_config::AppConfig;
use chatrelay_core::Provider;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("ChatRelay Doctor — Diagnostics");
    println!("==============================\n");

    let mut issues = 0;

    // Check config
    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  [!] No config file — run `chatrelay onboard`");
        issues += 1;
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  [ok] Config valid (provider: {})", config.default_provider);

            if config.has_api_key() {
                println!("  [ok] API key configured");
            } else {
                println!("  [!] No API key — set api_key in config.toml or CHATRELAY_API_KEY");
                issues += 1;
            }

            // Reachability check against the configured provider
            match chatrelay_providers::from_config(&config) {
                Ok(provider) => match provider.health_check().await {
                    Ok(true) => println!("  [ok] Provider '{}' reachable", provider.name()),
                    Ok(false) => {
                        println!("  [!] Provider '{}' returned an error", provider.name());
                        issues += 1;
                    }
                    Err(e) => {
                        println!("  [!] Provider unreachable: {e}");
                        issues += 1;
                    }
                },
                Err(e) => {
                    println!("  [!] Provider not buildable: {e}");
                    issues += 1;
                }
            }

            let tools = chatrelay_tools::default_registry();
            println!("  [ok] {} tools registered", tools.definitions().len());
        }
        Err(e) => {
            println!("  [x] Config invalid: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed.");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
