use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::models::quiz::{HydratedQuiz, StudentAnswer};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub all_correct: bool,
}

impl Grade {
    pub fn is_complete(&self) -> bool {
        self.answered == self.total
    }
}

/// The answers [`grade`] scores: the last answer to each question of `quiz`,
/// in question order. Answers to other questions are dropped.
pub fn latest_answers(quiz: &HydratedQuiz, answers: &[StudentAnswer]) -> Vec<StudentAnswer> {
    let latest: HashMap<Uuid, &str> = answers.iter().map(|a| (a.question_id, a.answer.as_str())).collect();
    quiz.questions
        .iter()
        .filter_map(|r| r.question_id.as_ref())
        .unique_by(|q| q.id)
        .filter_map(|q| {
            latest.get(&q.id).map(|answer| StudentAnswer {
                question_id: q.id,
                answer: answer.to_string(),
            })
        })
        .collect()
}

/// Scores `answers` against the correct answers of `quiz`.
///
/// Only answers to questions of the quiz count, and when one question is
/// answered several times the last answer wins. A question that no longer
/// exists can never be answered correctly.
pub fn grade(quiz: &HydratedQuiz, answers: &[StudentAnswer]) -> Grade {
    let latest: HashMap<Uuid, &str> = answers.iter().map(|a| (a.question_id, a.answer.as_str())).collect();
    let mut answered = 0;
    let mut correct = 0;
    for question in quiz.questions.iter().filter_map(|r| r.question_id.as_ref()) {
        if let Some(answer) = latest.get(&question.id) {
            answered += 1;
            if *answer == question.correct_answer {
                correct += 1;
            }
        }
    }
    let total = quiz.questions.len();
    Grade {
        total,
        answered,
        correct,
        all_correct: total > 0 && correct == total,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::question::Question;
    use crate::core::models::quiz::HydratedQuestionRef;
    use chrono::Utc;

    fn question(correct: &str) -> Question {
        Question {
            id: Uuid::new_v4(),
            question_text: "?".into(),
            options: vec!["a".into(), "b".into()],
            correct_answer: correct.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn quiz(questions: Vec<Option<Question>>) -> HydratedQuiz {
        HydratedQuiz {
            id: Uuid::new_v4(),
            title: "t".into(),
            topic: String::new(),
            course: String::new(),
            questions: questions.into_iter().map(|q| HydratedQuestionRef { question_id: q }).collect(),
            student_answers: vec![],
            completed: false,
            hidden: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn answer(q: &Question, answer: &str) -> StudentAnswer {
        StudentAnswer {
            question_id: q.id,
            answer: answer.into(),
        }
    }

    #[test]
    fn test_all_correct() {
        let (q1, q2) = (question("a"), question("b"));
        let g = grade(&quiz(vec![Some(q1.clone()), Some(q2.clone())]), &[answer(&q1, "a"), answer(&q2, "b")]);
        assert_eq!(g, Grade { total: 2, answered: 2, correct: 2, all_correct: true });
    }

    #[test]
    fn test_partial_answers_are_not_complete() {
        let (q1, q2) = (question("a"), question("b"));
        let g = grade(&quiz(vec![Some(q1.clone()), Some(q2)]), &[answer(&q1, "a")]);
        assert!(!g.is_complete());
        assert!(!g.all_correct);
        assert_eq!(g.correct, 1);
    }

    #[test]
    fn test_last_answer_wins_and_strangers_are_ignored() {
        let q1 = question("a");
        let stranger = question("a");
        let g = grade(&quiz(vec![Some(q1.clone())]), &[answer(&q1, "b"), answer(&stranger, "a"), answer(&q1, "a")]);
        assert_eq!(g, Grade { total: 1, answered: 1, correct: 1, all_correct: true });
    }

    #[test]
    fn test_latest_answers_keep_one_per_question() {
        let (q1, q2) = (question("a"), question("b"));
        let stranger = question("a");
        let answers = [answer(&q2, "x"), answer(&q1, "b"), answer(&stranger, "a"), answer(&q1, "a"), answer(&q2, "b")];
        let scored = latest_answers(&quiz(vec![Some(q1.clone()), Some(q2.clone()), None]), &answers);
        assert_eq!(scored, vec![answer(&q1, "a"), answer(&q2, "b")]);
    }

    #[test]
    fn test_dangling_question_is_never_correct() {
        let q1 = question("a");
        let g = grade(&quiz(vec![Some(q1.clone()), None]), &[answer(&q1, "a")]);
        assert_eq!(g.total, 2);
        assert!(!g.all_correct);
        assert!(!grade(&quiz(vec![]), &[]).all_correct);
    }
}
