//! Standalone HTML quiz export.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined. The page
//! shows the instructions, runs its own countdown, scores the attempt with
//! the same negative marking as the session, and reveals explanations after
//! submission.

use anyhow::{Context, Result};
use std::path::Path;

use quizmaster_core::instructions::InstructionSheet;
use quizmaster_core::model::{Branding, Language};
use quizmaster_core::session::ExportBundle;

/// Escape a string for safe HTML insertion.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Serialize data for an inline `<script type="application/json">` block.
pub(crate) fn embed_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("failed to serialize embedded data")?;
    Ok(json.replace('<', "\\u003c"))
}

/// Lowercase, dash-separated form of a title for file names.
pub(crate) fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// File name for an exported quiz, e.g. `indian-rivers-quiz.html`.
pub fn export_file_name(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        "quiz.html".to_string()
    } else {
        format!("{slug}-quiz.html")
    }
}

struct Labels {
    start: &'static str,
    submit: &'static str,
    time_left: &'static str,
    correct: &'static str,
    incorrect: &'static str,
    unattempted: &'static str,
    score: &'static str,
    explanation: &'static str,
    reference: &'static str,
}

fn labels(language: Language) -> Labels {
    match language {
        Language::English => Labels {
            start: "Start Quiz",
            submit: "Submit Quiz",
            time_left: "Time left",
            correct: "Correct",
            incorrect: "Incorrect",
            unattempted: "Unattempted",
            score: "Score",
            explanation: "Explanation",
            reference: "Reference",
        },
        Language::Hindi => Labels {
            start: "परीक्षा शुरू करें",
            submit: "परीक्षा जमा करें",
            time_left: "शेष समय",
            correct: "सही",
            incorrect: "गलत",
            unattempted: "अनुत्तरित",
            score: "अंक",
            explanation: "व्याख्या",
            reference: "संदर्भ",
        },
    }
}

/// Generate the standalone quiz document.
pub fn generate_quiz_html(bundle: &ExportBundle, branding: &Branding) -> Result<String> {
    let quiz = &bundle.quiz;
    let labels = labels(bundle.language);
    let sheet = InstructionSheet::new(
        bundle.language,
        &quiz.title,
        quiz.len(),
        bundle.total_time_secs,
        bundle.negative_marking,
    );

    let mut html = String::new();

    html.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n",
        bundle.language.code()
    ));
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>{} | {}</title>\n",
        html_escape(&quiz.title),
        html_escape(&branding.app_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&branding.app_name)));
    html.push_str(&format!(
        "<p class=\"links\"><a href=\"{}\" target=\"_blank\" rel=\"noopener\">YouTube</a> | <a href=\"{}\" target=\"_blank\" rel=\"noopener\">Telegram</a></p>\n",
        html_escape(&branding.youtube_link),
        html_escape(&branding.telegram_link)
    ));
    html.push_str("</header>\n");

    // Instructions
    html.push_str("<section id=\"instructions\">\n");
    html.push_str(&format!("<h2>{}</h2>\n", html_escape(&sheet.screen_title)));
    html.push_str(&format!(
        "<p class=\"meta\">{} | {} | {}</p>\n",
        html_escape(&sheet.quiz_name),
        html_escape(&sheet.total_time),
        html_escape(&sheet.total_marks)
    ));
    html.push_str(&format!("<p>{}</p>\n<ol>\n", html_escape(&sheet.header)));
    for line in &sheet.instructions {
        html.push_str(&format!("<li>{}</li>\n", html_escape(line)));
    }
    html.push_str("</ol>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{}<br>{}</p>\n",
        html_escape(&sheet.language_message),
        html_escape(&sheet.language_disclaimer)
    ));
    html.push_str(&format!(
        "<label><input type=\"checkbox\" id=\"agree\"> {}</label>\n",
        html_escape(&sheet.agree_label)
    ));
    html.push_str(&format!(
        "<p><button id=\"start\" disabled>{}</button></p>\n",
        labels.start
    ));
    html.push_str("</section>\n");

    // Questions
    html.push_str("<section id=\"quiz\" hidden>\n");
    html.push_str(&format!(
        "<div class=\"timer\">{}: <span id=\"timer\"></span></div>\n",
        labels.time_left
    ));
    html.push_str(&format!("<h2>{}</h2>\n", html_escape(&quiz.title)));
    for (n, q) in quiz.questions.iter().enumerate() {
        html.push_str(&format!(
            "<div class=\"question\" id=\"q{}\">\n<p><strong>{}.</strong> {}</p>\n",
            q.id,
            n + 1,
            html_escape(&q.text)
        ));
        if let Some(reference) = &q.reference {
            html.push_str(&format!(
                "<p class=\"meta\">{}: {}</p>\n",
                labels.reference,
                html_escape(reference)
            ));
        }
        for (i, option) in q.options.iter().enumerate() {
            html.push_str(&format!(
                "<label class=\"option\" id=\"q{}o{i}\"><input type=\"radio\" name=\"q{}\" value=\"{i}\"> {}</label>\n",
                q.id,
                q.id,
                html_escape(option)
            ));
        }
        html.push_str(&format!(
            "<div class=\"explanation\" hidden><strong>{}:</strong> {}</div>\n</div>\n",
            labels.explanation,
            html_escape(&q.explanation)
        ));
    }
    html.push_str(&format!(
        "<p><button id=\"submit\">{}</button></p>\n",
        labels.submit
    ));
    html.push_str("</section>\n");

    // Results
    html.push_str("<section id=\"result\" hidden>\n");
    html.push_str(&format!(
        "<table class=\"summary\"><tbody>\n<tr><th>{}</th><td id=\"r-correct\"></td></tr>\n<tr><th>{}</th><td id=\"r-incorrect\"></td></tr>\n<tr><th>{}</th><td id=\"r-unattempted\"></td></tr>\n<tr><th>{}</th><td id=\"r-score\"></td></tr>\n</tbody></table>\n",
        labels.correct, labels.incorrect, labels.unattempted, labels.score
    ));
    html.push_str("</section>\n");

    // Data
    let data = serde_json::json!({
        "title": quiz.title,
        "totalTimeSecs": bundle.total_time_secs,
        "negativeMarking": bundle.negative_marking,
        "questions": quiz.questions.iter().map(|q| serde_json::json!({
            "id": q.id,
            "correctIndex": q.correct_index,
        })).collect::<Vec<_>>(),
    });
    html.push_str("<script type=\"application/json\" id=\"quiz-data\">");
    html.push_str(&embed_json(&data)?);
    html.push_str("</script>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    Ok(html)
}

/// Write the standalone quiz document to a file.
pub fn write_quiz_html(bundle: &ExportBundle, branding: &Branding, path: &Path) -> Result<()> {
    let html = generate_quiz_html(bundle, branding)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write quiz to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --accent: #2563eb; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --accent: #60a5fa; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans Devanagari', sans-serif; margin: 0 auto; max-width: 48rem; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 1.5rem; }
a { color: var(--accent); }
.meta { color: #6b7280; }
.question { border: 1px solid var(--border); border-radius: 8px; padding: 1rem; margin: 1rem 0; }
.option { display: block; padding: 0.4rem 0.6rem; border-radius: 6px; cursor: pointer; }
.option.correct { background: var(--pass); }
.option.wrong { background: var(--fail); }
.explanation { margin-top: 0.75rem; padding: 0.75rem; border-left: 4px solid var(--accent); background: var(--border); }
.timer { position: sticky; top: 0; background: var(--bg); padding: 0.5rem 0; font-weight: bold; border-bottom: 1px solid var(--border); }
.timer.low { color: #ef4444; }
table { border-collapse: collapse; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
button { font-size: 1rem; padding: 0.6rem 1.4rem; border: 0; border-radius: 6px; background: var(--accent); color: #fff; cursor: pointer; }
button:disabled { opacity: 0.5; cursor: not-allowed; }
"#;

const JS: &str = r#"
const data = JSON.parse(document.getElementById('quiz-data').textContent);
let remaining = data.totalTimeSecs;
let timer = null;
let submitted = false;

function fmt(secs) {
  const m = Math.floor(secs / 60), s = secs % 60;
  return String(m).padStart(2, '0') + ':' + String(s).padStart(2, '0');
}

function tick() {
  remaining = Math.max(0, remaining - 1);
  const el = document.getElementById('timer');
  el.textContent = fmt(remaining);
  el.parentElement.classList.toggle('low', remaining <= 60);
  if (remaining === 0) submitQuiz();
}

function round(v, places) {
  const f = Math.pow(10, places);
  return Math.round(v * f) / f;
}

function submitQuiz() {
  if (submitted) return;
  submitted = true;
  clearInterval(timer);
  let correct = 0, incorrect = 0, unattempted = 0;
  for (const q of data.questions) {
    const picked = document.querySelector('input[name="q' + q.id + '"]:checked');
    document.querySelectorAll('input[name="q' + q.id + '"]').forEach(i => i.disabled = true);
    document.getElementById('q' + q.id + 'o' + q.correctIndex).classList.add('correct');
    if (!picked) {
      unattempted++;
    } else if (Number(picked.value) === q.correctIndex) {
      correct++;
    } else {
      incorrect++;
      document.getElementById('q' + q.id + 'o' + picked.value).classList.add('wrong');
    }
    document.querySelector('#q' + q.id + ' .explanation').hidden = false;
  }
  const total = data.questions.length;
  const score = round(Math.max(0, correct - incorrect * data.negativeMarking), 2);
  const pct = total > 0 ? round(score / total * 100, 1) : 0;
  document.getElementById('r-correct').textContent = correct;
  document.getElementById('r-incorrect').textContent = incorrect;
  document.getElementById('r-unattempted').textContent = unattempted;
  document.getElementById('r-score').textContent = score.toFixed(2) + ' / ' + total + ' (' + pct.toFixed(1) + '%)';
  document.getElementById('submit').disabled = true;
  document.getElementById('result').hidden = false;
  document.getElementById('result').scrollIntoView();
}

document.getElementById('agree').addEventListener('change', e => {
  document.getElementById('start').disabled = !e.target.checked;
});
document.getElementById('start').addEventListener('click', () => {
  document.getElementById('instructions').hidden = true;
  document.getElementById('quiz').hidden = false;
  document.getElementById('timer').textContent = fmt(remaining);
  timer = setInterval(tick, 1000);
});
document.getElementById('submit').addEventListener('click', submitQuiz);
"#;
