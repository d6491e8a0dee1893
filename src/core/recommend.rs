use crate::core::questionnaire::AnsweredQuestion;
use crate::domain::model::Recommendation;

pub const PRIORITY_COUNT: usize = 3;

/// The three lowest-scoring questions, ascending.
///
/// `sort_by_key` is stable, so equal scores keep declaration order.
pub fn select_priorities(answered: &[AnsweredQuestion]) -> Vec<Recommendation> {
    let mut ranked: Vec<&AnsweredQuestion> = answered.iter().collect();
    ranked.sort_by_key(|a| a.score);

    ranked
        .into_iter()
        .take(PRIORITY_COUNT)
        .map(|a| Recommendation {
            question_id: a.question.id,
            dimension: a.question.dimension,
            advisory: a.question.advisory,
            score: a.score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::questionnaire::{resolve, QUESTIONS};
    use crate::domain::model::{AnswerSet, Dimension, Score};

    fn priorities_for(values: [u8; 10]) -> Vec<Recommendation> {
        let answers: AnswerSet = QUESTIONS
            .iter()
            .zip(values)
            .map(|(q, v)| (q.id, Score::new(v).unwrap()))
            .collect();
        select_priorities(&resolve(&answers).unwrap())
    }

    fn ids(recommendations: &[Recommendation]) -> Vec<&'static str> {
        recommendations.iter().map(|r| r.question_id).collect()
    }

    #[test]
    fn test_lowest_three_ascending() {
        let recs = priorities_for([4, 3, 0, 4, 2, 4, 1, 4, 4, 4]);
        assert_eq!(ids(&recs), vec!["Q3", "Q7", "Q5"]);
        assert_eq!(recs[0].dimension, Dimension::Automation);
        assert_eq!(
            recs[0].advisory,
            "Mapear gargalos e avaliar automação incremental no processo mais crítico."
        );
    }

    #[test]
    fn test_ties_keep_declaration_order() {
        let recs = priorities_for([2; 10]);
        assert_eq!(ids(&recs), vec!["Q1", "Q2", "Q3"]);

        let recs = priorities_for([3, 1, 3, 3, 1, 3, 3, 3, 3, 1]);
        assert_eq!(ids(&recs), vec!["Q2", "Q5", "Q10"]);
    }

    #[test]
    fn test_always_three_entries() {
        for values in [[0; 10], [4; 10], [0, 1, 2, 3, 4, 0, 1, 2, 3, 4]] {
            let recs = priorities_for(values);
            assert_eq!(recs.len(), PRIORITY_COUNT);
            assert!(recs.windows(2).all(|w| w[0].score <= w[1].score));
            assert!(recs
                .iter()
                .all(|r| QUESTIONS.iter().any(|q| q.id == r.question_id)));
        }
    }
}
