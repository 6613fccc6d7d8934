use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizmaster_core::parser::{extract_json_from_markdown, parse_quiz_response, parse_quiz_str};

fn quiz_json(n: usize) -> String {
    let questions: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"id": {i}, "text": "Question {i}?", "options": ["a", "b", "c", "d"], "correctIndex": {}, "explanation": "because {i}"}}"#,
                i % 4
            )
        })
        .collect();
    format!(
        r#"{{"quizTitle": "Bench", "questions": [{}]}}"#,
        questions.join(",")
    )
}

fn bench_extract_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_json");

    let raw = quiz_json(10);
    let fenced = format!("Here is your quiz:\n\n```json\n{raw}\n```\n");
    let generic = format!("```\n{raw}\n```");

    group.bench_function("raw", |b| {
        b.iter(|| extract_json_from_markdown(black_box(&raw)))
    });

    group.bench_function("json_fence", |b| {
        b.iter(|| extract_json_from_markdown(black_box(&fenced)))
    });

    group.bench_function("generic_fence", |b| {
        b.iter(|| extract_json_from_markdown(black_box(&generic)))
    });

    group.finish();
}

fn bench_quiz_response(c: &mut Criterion) {
    let mut group = c.benchmark_group("quiz_response");

    for n in [25usize, 100] {
        let body = format!("```json\n{}\n```", quiz_json(n));
        group.bench_function(format!("{n}_questions"), |b| {
            b.iter(|| parse_quiz_response(black_box(&body)))
        });
    }

    group.finish();
}

fn bench_toml_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("toml_parsing");

    for n in [5usize, 50, 200] {
        let toml = generate_quiz_toml(n);
        group.bench_function(format!("{n}_questions"), |b| {
            b.iter(|| parse_quiz_str(black_box(&toml), black_box("bench.toml".as_ref())))
        });
    }

    group.finish();
}

fn generate_quiz_toml(n: usize) -> String {
    let mut s = String::from("[quiz]\ntitle = \"Benchmark\"\n");
    for i in 1..=n {
        s.push_str(&format!(
            r#"
[[questions]]
id = {i}
text = "Question {i}?"
options = ["a", "b", "c", "d"]
correct_index = {}
explanation = "Because {i}."
"#,
            i % 4
        ));
    }
    s
}

criterion_group!(benches, bench_extract_json, bench_quiz_response, bench_toml_parsing);
criterion_main!(benches);
