use crate::core::error::MatchError;
use crate::core::store::AnswerStore;
use crate::models::{Answer, ComparedQuestion, ProfileId};

/// Both profiles chose the same possible answer
#[inline]
pub fn agrees(own: &Answer, other: &Answer) -> bool {
    own.user_answer == other.user_answer
}

/// Each profile's choice lies in the other profile's acceptable set
#[inline]
pub fn mutually_acceptable(own: &Answer, other: &Answer) -> bool {
    other.accepts(own.user_answer) && own.accepts(other.user_answer)
}

/// Compare the viewing profile against another profile's answers
///
/// Every question the other profile answered is listed, in question id
/// order, whether or not the viewing profile answered it too. Missing own
/// answers are reported as `None` and never agree.
pub fn compare<S: AnswerStore>(
    store: &S,
    profile_id: ProfileId,
    other_id: ProfileId,
) -> Result<Vec<ComparedQuestion>, MatchError> {
    store.require_profile(profile_id)?;
    store.require_profile(other_id)?;

    let mut compared: Vec<ComparedQuestion> = store
        .list_answers_by_profile(other_id)
        .into_iter()
        .filter_map(|other_answer| {
            let question = store.question(other_answer.question_id)?;
            let own_answer = store.get_answer(question.id, profile_id);

            let (agree, acceptable) = match own_answer {
                Some(own) => (agrees(own, other_answer), mutually_acceptable(own, other_answer)),
                None => (false, false),
            };

            Some(ComparedQuestion {
                question: question.clone(),
                own_answer: own_answer.cloned(),
                other_answer: other_answer.clone(),
                agrees: agree,
                mutually_acceptable: acceptable,
            })
        })
        .collect();

    compared.sort_by_key(|c| c.question.id);
    Ok(compared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::Snapshot;
    use crate::models::{AnswerSubmission, AnswerValue, Gender, Importance, PossibleAnswerId, QuestionId};
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn answer(store: &mut Snapshot, q: QuestionId, p: ProfileId, choice: PossibleAnswerId, accept: &[PossibleAnswerId]) {
        store
            .upsert_answer(
                AnswerSubmission {
                    question_id: q,
                    profile_id: p,
                    user_answer: choice,
                    acceptable_answers: accept.iter().copied().collect::<BTreeSet<_>>(),
                    importance: Importance::Mandatory,
                    is_public: true,
                    description: None,
                },
                Utc::now(),
            )
            .unwrap();
    }

    #[test]
    fn test_compare_without_overlap_is_empty() {
        let mut store = Snapshot::new();
        let q = store.add_question("Hallo?", None, None, true).unwrap();
        let yes = store.add_possible_answer(q, "yes", AnswerValue::Agree).unwrap();
        let me = store.add_profile(uuid::Uuid::new_v4(), Gender::Female);
        let other = store.add_profile(uuid::Uuid::new_v4(), Gender::Male);
        answer(&mut store, q, me, yes, &[yes]);

        assert!(compare(&store, me, other).unwrap().is_empty());
    }

    #[test]
    fn test_compare_lists_only_other_profiles_questions() {
        let mut store = Snapshot::new();
        let q1 = store.add_question("One?", None, None, true).unwrap();
        let q2 = store.add_question("Two?", None, None, true).unwrap();
        let a1 = store.add_possible_answer(q1, "yes", AnswerValue::Agree).unwrap();
        let a2 = store.add_possible_answer(q2, "yes", AnswerValue::Agree).unwrap();
        let me = store.add_profile(uuid::Uuid::new_v4(), Gender::Female);
        let other = store.add_profile(uuid::Uuid::new_v4(), Gender::Male);
        answer(&mut store, q1, me, a1, &[a1]);
        answer(&mut store, q2, other, a2, &[a2]);

        let rows = compare(&store, me, other).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question.id, q2);
        assert!(rows[0].own_answer.is_none());
        assert!(!rows[0].agrees);
        assert!(!rows[0].mutually_acceptable);
    }

    #[test]
    fn test_agreement_and_mutual_acceptability_are_separate() {
        let mut store = Snapshot::new();
        let q1 = store.add_question("Same choice?", None, None, true).unwrap();
        let q2 = store.add_question("Different choice?", None, None, true).unwrap();
        let q1_yes = store.add_possible_answer(q1, "yes", AnswerValue::Agree).unwrap();
        let q1_no = store.add_possible_answer(q1, "no", AnswerValue::Disagree).unwrap();
        let q2_yes = store.add_possible_answer(q2, "yes", AnswerValue::Agree).unwrap();
        let q2_no = store.add_possible_answer(q2, "no", AnswerValue::Disagree).unwrap();
        let me = store.add_profile(uuid::Uuid::new_v4(), Gender::Female);
        let other = store.add_profile(uuid::Uuid::new_v4(), Gender::Male);

        // same choice, but the other profile would not accept it
        answer(&mut store, q1, me, q1_yes, &[q1_yes]);
        answer(&mut store, q1, other, q1_yes, &[q1_no]);
        // different choices, each accepted by the other side
        answer(&mut store, q2, me, q2_yes, &[q2_yes, q2_no]);
        answer(&mut store, q2, other, q2_no, &[q2_yes, q2_no]);

        let rows = compare(&store, me, other).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].agrees);
        assert!(!rows[0].mutually_acceptable);
        assert!(!rows[1].agrees);
        assert!(rows[1].mutually_acceptable);
    }

    #[test]
    fn test_compare_unknown_profile_fails() {
        let mut store = Snapshot::new();
        let me = store.add_profile(uuid::Uuid::new_v4(), Gender::Female);
        let err = compare(&store, me, 99).unwrap_err();
        assert_eq!(err, MatchError::not_found("profile", 99));
    }
}
