//! The `quizmaster present` command.

use anyhow::{Context, Result};

use quizmaster_core::traits::PresentationRequest;
use quizmaster_providers::config::source_from_config;
use quizmaster_report::{deck_file_name, write_deck_html};

use super::{read_input, Setup};
use crate::{InputArgs, SourceArgs};

pub async fn execute(input: InputArgs, source: SourceArgs) -> Result<()> {
    let setup = Setup::load(&source, None)?;
    let input = read_input(&input)?.context("a topic or text file is required")?;
    anyhow::ensure!(
        !input.is_blank(),
        "Please enter a topic or paste some text first."
    );

    let source = source_from_config(&setup.config, setup.provider.as_deref())?;
    let request = PresentationRequest {
        model: setup.settings.model.clone(),
        input,
        language: setup.settings.language,
        temperature: setup.settings.temperature,
    };

    eprintln!("  Generating presentation...");
    let deck = source
        .generate_presentation(&request)
        .await
        .context("Failed to generate presentation")?;

    let path = setup.output_dir.join(deck_file_name(&deck.title));
    write_deck_html(&deck, &setup.config.branding, &path)?;
    println!(
        "Presentation \"{}\" ({} slides) written to {}",
        deck.title,
        deck.slides.len(),
        path.display()
    );

    Ok(())
}
