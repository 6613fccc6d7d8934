//! Localized instruction sheet shown before a quiz starts.

use crate::model::Language;

/// Fully rendered instruction text for one quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionSheet {
    pub screen_title: String,
    pub quiz_name: String,
    pub total_time: String,
    pub total_marks: String,
    pub header: String,
    pub instructions: Vec<String>,
    pub language_message: String,
    pub language_disclaimer: String,
    pub agree_label: String,
}

impl InstructionSheet {
    pub fn new(
        language: Language,
        quiz_title: &str,
        question_count: usize,
        total_time_secs: u64,
        negative_marking: f64,
    ) -> Self {
        let minutes = total_time_secs / 60;
        let neg = format!("{negative_marking:.2}");
        match language {
            Language::English => Self {
                screen_title: "Quiz Instructions".into(),
                quiz_name: format!("Quiz Name: {quiz_title}"),
                total_time: format!("Time: {minutes} Minutes"),
                total_marks: format!("Max Marks: {question_count}"),
                header: "Please read the following instructions carefully:".into(),
                instructions: vec![
                    format!("The quiz consists of {question_count} questions."),
                    "Each question has 4 options, out of which only 1 is correct.".into(),
                    format!("You will have {minutes} minutes to complete the quiz."),
                    format!("There is negative marking for incorrect answers. {neg} marks will be deducted for each wrong answer."),
                    "1 mark will be awarded for each correct answer.".into(),
                    "No marks will be deducted for unattempted questions.".into(),
                    "Please ensure you complete the quiz before submitting or closing the quiz.".into(),
                ],
                language_message: format!(
                    "Your default language for the quiz is: {}",
                    language.name()
                ),
                language_disclaimer: "All questions will be displayed in this language. This cannot be changed later.".into(),
                agree_label: "I have read and understood all the instructions and agree to abide by them.".into(),
            },
            Language::Hindi => Self {
                screen_title: "परीक्षा निर्देश".into(),
                quiz_name: format!("परीक्षा का नाम: {quiz_title}"),
                total_time: format!("समय: {minutes} मिनट"),
                total_marks: format!("पूर्णांक: {question_count}"),
                header: "कृपया निम्नलिखित निर्देशों को ध्यानपूर्वक पढ़ें:".into(),
                instructions: vec![
                    format!("परीक्षा में {question_count} प्रश्न हैं।"),
                    "प्रत्येक प्रश्न में दिए गए 4 विकल्पों में से केवल 1 विकल्प सही उत्तर के रूप में उपलब्ध होगा।".into(),
                    format!("आपको परीक्षा समाप्त करने के लिए {minutes} मिनट का समय मिलेगा।"),
                    format!("गलत उत्तर पर नकारात्मक अंकन है: प्रत्येक गलत उत्तर के लिए {neg} अंक काटे जाएंगे।"),
                    "प्रत्येक सही उत्तर के लिए 1 अंक दिया जाएगा।".into(),
                    "प्रयास न किए गए प्रश्नों के लिए कोई अंक नहीं काटा जाएगा।".into(),
                    "कृपया सुनिश्चित करें कि आप परीक्षा सबमिट करने से पहले या बंद करने से पहले परीक्षा पूरी कर लें।".into(),
                ],
                language_message: format!(
                    "आपकी परीक्षा की डिफ़ॉल्ट भाषा है: {}",
                    language.native_name()
                ),
                language_disclaimer: "सभी प्रश्न इसी भाषा में प्रदर्शित होंगे। इसे बाद में बदला नहीं जा सकता।".into(),
                agree_label: "मैंने सभी निर्देशों को ध्यान से पढ़ लिया है और समझ लिया है, और मैं उनका पालन करने के लिए सहमत हूं।".into(),
            },
        }
    }

    /// Plain-text rendering, one item per line.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{}\n{}\n{} | {}\n\n{}\n",
            self.screen_title, self.quiz_name, self.total_time, self.total_marks, self.header
        );
        for (i, line) in self.instructions.iter().enumerate() {
            out.push_str(&format!("  {}. {line}\n", i + 1));
        }
        out.push_str(&format!(
            "\n{}\n{}\n",
            self.language_message, self.language_disclaimer
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_sheet() {
        let sheet = InstructionSheet::new(Language::English, "Rivers", 50, 1800, 1.0 / 3.0);
        assert_eq!(sheet.total_time, "Time: 30 Minutes");
        assert_eq!(sheet.total_marks, "Max Marks: 50");
        assert_eq!(sheet.instructions.len(), 7);
        assert!(sheet.instructions[3].contains("0.33 marks"));
        assert!(sheet.to_text().contains("  1. The quiz consists of 50 questions."));
    }

    #[test]
    fn hindi_sheet() {
        let sheet = InstructionSheet::new(Language::Hindi, "नदियाँ", 25, 900, 1.0 / 3.0);
        assert_eq!(sheet.total_time, "समय: 15 मिनट");
        assert!(sheet.language_message.contains("हिन्दी"));
        assert!(sheet.quiz_name.contains("नदियाँ"));
    }
}
