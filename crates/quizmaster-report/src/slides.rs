//! HTML slide deck renderer.

use anyhow::{Context, Result};
use std::path::Path;

use quizmaster_core::model::Branding;
use quizmaster_core::slides::{Slide, SlideDeck, SlideKind};

use crate::html::{html_escape, slugify};

/// Render a deck as a single self-contained HTML page. Arrow keys move
/// between slides; question slides reveal their answer on click.
pub fn generate_deck_html(deck: &SlideDeck, branding: &Branding) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>{} | {}</title>\n",
        html_escape(&deck.title),
        html_escape(&branding.app_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    for (i, slide) in deck.slides.iter().enumerate() {
        html.push_str(&format!(
            "<section class=\"slide {}\"{}>\n",
            kind_class(slide.kind),
            if i == 0 { "" } else { " hidden" }
        ));
        render_slide(&mut html, slide);
        if let Some(notes) = &slide.notes {
            html.push_str(&format!(
                "<aside class=\"notes\">{}</aside>\n",
                html_escape(notes)
            ));
        }
        html.push_str(&format!(
            "<footer>{} | {}/{}</footer>\n</section>\n",
            html_escape(&branding.app_name),
            i + 1,
            deck.slides.len()
        ));
    }

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");
    html.push_str("</body>\n</html>");
    html
}

fn kind_class(kind: SlideKind) -> &'static str {
    match kind {
        SlideKind::TitleSlide => "title",
        SlideKind::ContentSlide => "content",
        SlideKind::QuestionSlide => "question",
        SlideKind::ExplanationSlide => "explanation",
        SlideKind::SectionHeaderSlide => "section",
        SlideKind::ImageSlide => "image",
        SlideKind::ThankYouSlide => "thanks",
    }
}

fn render_slide(html: &mut String, slide: &Slide) {
    match slide.kind {
        SlideKind::TitleSlide | SlideKind::SectionHeaderSlide | SlideKind::ThankYouSlide => {
            html.push_str(&format!("<h1>{}</h1>\n", html_escape(&slide.title)));
            for line in &slide.content {
                html.push_str(&format!("<p class=\"subtitle\">{}</p>\n", html_escape(line)));
            }
        }
        SlideKind::QuestionSlide => {
            html.push_str(&format!("<h2>{}</h2>\n", html_escape(&slide.title)));
            for line in &slide.content {
                html.push_str(&format!("<p>{}</p>\n", html_escape(line)));
            }
            html.push_str("<ol type=\"A\">\n");
            for (i, option) in slide.options.iter().flatten().enumerate() {
                let class = if Some(i) == slide.correct_option_index {
                    " class=\"answer\""
                } else {
                    ""
                };
                html.push_str(&format!("<li{class}>{}</li>\n", html_escape(option)));
            }
            html.push_str("</ol>\n");
            if let Some(explanation) = &slide.explanation {
                html.push_str(&format!(
                    "<p class=\"reveal\" hidden>{}</p>\n",
                    html_escape(explanation)
                ));
            }
        }
        SlideKind::ImageSlide => {
            html.push_str(&format!("<h2>{}</h2>\n", html_escape(&slide.title)));
            for line in &slide.content {
                html.push_str(&format!(
                    "<figure><div class=\"placeholder\"></div><figcaption>{}</figcaption></figure>\n",
                    html_escape(line)
                ));
            }
        }
        SlideKind::ContentSlide | SlideKind::ExplanationSlide => {
            html.push_str(&format!("<h2>{}</h2>\n<ul>\n", html_escape(&slide.title)));
            for line in &slide.content {
                html.push_str(&format!("<li>{}</li>\n", html_escape(line)));
            }
            html.push_str("</ul>\n");
        }
    }
}

/// File name for a rendered deck, e.g. `photosynthesis-presentation.html`.
pub fn deck_file_name(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        "presentation.html".to_string()
    } else {
        format!("{slug}-presentation.html")
    }
}

/// Write a rendered deck to a file.
pub fn write_deck_html(deck: &SlideDeck, branding: &Branding, path: &Path) -> Result<()> {
    let html = generate_deck_html(deck, branding);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write presentation to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #0f172a; --fg: #f8fafc; --accent: #38bdf8; --muted: #94a3b8; }
body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans Devanagari', sans-serif; background: var(--bg); color: var(--fg); }
.slide { box-sizing: border-box; height: 100vh; padding: 6vh 8vw; display: flex; flex-direction: column; justify-content: center; position: relative; }
.slide h1 { font-size: 3.5rem; text-align: center; }
.slide h2 { font-size: 2.4rem; color: var(--accent); }
.slide li, .slide p { font-size: 1.6rem; line-height: 1.5; }
.subtitle { text-align: center; color: var(--muted); }
.question.revealed .answer { color: #4ade80; font-weight: bold; }
.placeholder { height: 30vh; border: 2px dashed var(--muted); border-radius: 12px; }
.notes { display: none; }
footer { position: absolute; bottom: 2vh; right: 4vw; color: var(--muted); font-size: 0.9rem; }
"#;

const JS: &str = r#"
const slides = Array.from(document.querySelectorAll('.slide'));
let current = 0;
function show(n) {
  slides[current].hidden = true;
  current = Math.max(0, Math.min(slides.length - 1, n));
  slides[current].hidden = false;
}
document.addEventListener('keydown', e => {
  if (e.key === 'ArrowRight' || e.key === ' ') show(current + 1);
  if (e.key === 'ArrowLeft') show(current - 1);
});
slides.forEach(s => s.addEventListener('click', () => {
  if (s.classList.contains('question') && !s.classList.contains('revealed')) {
    s.classList.add('revealed');
    s.querySelectorAll('.reveal').forEach(r => r.hidden = false);
  } else {
    show(current + 1);
  }
}));
"#;
