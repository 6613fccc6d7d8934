use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizmaster_core::model::{Question, QuestionId};
use quizmaster_core::scoring::score_answers;
use quizmaster_core::tracker::AnswerSheet;

fn make_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question {
            id: i as QuestionId + 1,
            text: format!("Question {i}"),
            reference: None,
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: i % 4,
            explanation: String::new(),
        })
        .collect()
}

/// Every third question unattempted, the rest alternating right and wrong.
fn make_sheet(questions: &[Question]) -> AnswerSheet {
    let mut sheet = AnswerSheet::for_questions(questions);
    for (i, q) in questions.iter().enumerate() {
        if i % 3 == 2 {
            continue;
        }
        let pick = if i % 2 == 0 {
            q.correct_index
        } else {
            (q.correct_index + 1) % 4
        };
        sheet.select_option(q.id, pick).unwrap();
        sheet.add_elapsed(q.id, (i % 40) as u64).unwrap();
    }
    sheet
}

fn bench_score_answers(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_answers");

    for n in [25usize, 100, 1000] {
        let questions = make_questions(n);
        let sheet = make_sheet(&questions);
        group.bench_function(format!("{n}_questions"), |b| {
            b.iter(|| score_answers(black_box(&questions), black_box(sheet.records())))
        });
    }

    group.finish();
}

fn bench_status_counts(c: &mut Criterion) {
    let questions = make_questions(100);
    let sheet = make_sheet(&questions);
    c.bench_function("status_counts/100_questions", |b| {
        b.iter(|| black_box(&sheet).status_counts())
    });
}

criterion_group!(benches, bench_score_answers, bench_status_counts);
criterion_main!(benches);
