//! The `quizmaster list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmaster_providers::create_source;

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = quizmaster_providers::config::load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    let mut found_any = false;

    for name in names {
        if provider_filter.as_ref().is_some_and(|filter| filter != name) {
            continue;
        }

        let source = match create_source(name, &config.providers[name]) {
            Ok(source) => source,
            Err(e) => {
                println!("Provider: {name} (unavailable: {e})\n");
                continue;
            }
        };
        let models = source.available_models();

        if !models.is_empty() {
            found_any = true;
            let default_marker = |id: &str| {
                if *name == config.default_provider && id == config.default_model {
                    " [default]"
                } else {
                    ""
                }
            };
            println!("Provider: {name}");
            for model in &models {
                println!(
                    "  {} — {} ({}K context){}",
                    model.id,
                    model.name,
                    model.max_context / 1000,
                    default_marker(&model.id),
                );
            }
            println!();
        }
    }

    if !found_any {
        println!("No providers configured. Run `quizmaster init` to create a config file.");
    }

    Ok(())
}
