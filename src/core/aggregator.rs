use crate::core::answers::last_answer;
use crate::core::error::MatchError;
use crate::core::profiles::with_gender;
use crate::core::store::AnswerStore;
use crate::models::{Answer, Gender, GenderSplit, OptionShare, PossibleAnswer, Profile, ProfileId, QuestionId, QuestionStats};

/// Whole percent of `count` out of `total`, truncated towards zero
///
/// A zero `total` yields 0 rather than a division fault.
#[inline]
pub fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as u64 * 100) / total as u64) as u32
}

/// `count / total` as a fraction, 0.0 when `total` is zero
#[inline]
pub fn quote(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn distribution<S, F>(store: &S, question_id: QuestionId, counts: F) -> Result<Vec<OptionShare>, MatchError>
where
    S: AnswerStore,
    F: Fn(&Answer, &PossibleAnswer) -> bool,
{
    store.require_question(question_id)?;
    let answers = store.list_answers(question_id);
    let total = answers.len();

    let shares = store
        .possible_answers(question_id)
        .into_iter()
        .map(|option| {
            let matching = answers.iter().filter(|&&a| counts(a, option)).count();
            OptionShare {
                possible_answer_id: option.id,
                answer: option.answer.clone(),
                percent: percent(matching, total),
            }
        })
        .collect();
    Ok(shares)
}

/// Share of answers that chose each possible answer of the question
pub fn answer_distribution<S: AnswerStore>(store: &S, question_id: QuestionId) -> Result<Vec<OptionShare>, MatchError> {
    distribution(store, question_id, |answer, option| answer.user_answer == option.id)
}

/// Share of answers that would accept each possible answer of the question
pub fn acceptable_distribution<S: AnswerStore>(
    store: &S,
    question_id: QuestionId,
) -> Result<Vec<OptionShare>, MatchError> {
    distribution(store, question_id, |answer, option| answer.accepts(option.id))
}

/// Female and male counts and fractions over a set of profiles
///
/// Fractions are relative to the whole set, profiles with an undefined
/// gender included. An empty set is rejected with `EmptyProfileSet`.
pub fn gender_split<'a, I>(profiles: I) -> Result<GenderSplit, MatchError>
where
    I: IntoIterator<Item = &'a Profile>,
{
    let profiles: Vec<&Profile> = profiles.into_iter().collect();
    let total = profiles.len();
    let female_count = with_gender(profiles.iter().copied(), Gender::Female).len();
    let male_count = with_gender(profiles.iter().copied(), Gender::Male).len();

    if total == 0 {
        return Err(MatchError::EmptyProfileSet);
    }

    Ok(GenderSplit {
        female_count,
        male_count,
        female_fraction: female_count as f64 / total as f64,
        male_fraction: male_count as f64 / total as f64,
    })
}

fn answers_from_gender<S: AnswerStore>(store: &S, answers: &[&Answer], gender: Gender) -> usize {
    answers
        .iter()
        .filter(|a| store.profile(a.profile_id).map_or(false, |p| p.gender == gender))
        .count()
}

/// Fraction of the question's answers given by profiles of `gender`
pub fn answer_quote<S: AnswerStore>(store: &S, question_id: QuestionId, gender: Gender) -> Result<f64, MatchError> {
    store.require_question(question_id)?;
    let answers = store.list_answers(question_id);
    Ok(quote(answers_from_gender(store, &answers, gender), answers.len()))
}

/// Fraction of other `gender` profiles' answers that would accept the profile's answer
///
/// Only answers from profiles of `gender` other than `profile_id` count.
/// Yields 0.0 when there are none. The profile must have answered.
pub fn acceptance_quote<S: AnswerStore>(
    store: &S,
    question_id: QuestionId,
    profile_id: ProfileId,
    gender: Gender,
) -> Result<f64, MatchError> {
    store.require_question(question_id)?;
    store.require_profile(profile_id)?;
    let own = store
        .get_answer(question_id, profile_id)
        .ok_or_else(|| MatchError::not_found("answer", format!("{}/{}", question_id, profile_id)))?;

    let others: Vec<&Answer> = store
        .list_answers(question_id)
        .into_iter()
        .filter(|a| a.profile_id != profile_id)
        .filter(|a| store.profile(a.profile_id).map_or(false, |p| p.gender == gender))
        .collect();
    let accepting = others.iter().filter(|a| a.accepts(own.user_answer)).count();

    Ok(quote(accepting, others.len()))
}

/// Collect all statistics shown on a question page
pub fn question_stats<S: AnswerStore>(store: &S, question_id: QuestionId) -> Result<QuestionStats, MatchError> {
    store.require_question(question_id)?;
    let answers = store.list_answers(question_id);
    let all_answer_count = answers.len();
    let male_answer_count = answers_from_gender(store, &answers, Gender::Male);
    let female_answer_count = answers_from_gender(store, &answers, Gender::Female);

    Ok(QuestionStats {
        question_id,
        possible_answer_count: store.possible_answers(question_id).len(),
        all_answer_count,
        male_answer_count,
        female_answer_count,
        male_quote: quote(male_answer_count, all_answer_count),
        female_quote: quote(female_answer_count, all_answer_count),
        last_answer: last_answer(store, question_id),
        answer_distribution: answer_distribution(store, question_id)?,
        acceptable_distribution: acceptable_distribution(store, question_id)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::Snapshot;
    use crate::models::{AnswerSubmission, AnswerValue, Importance, PossibleAnswerId};
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
                    importance: Importance::default(),
                    is_public: true,
                    description: None,
                },
                Utc::now(),
            )
            .unwrap();
    }

    #[test]
    fn test_percent_truncates() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 66);
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(5, 0), 0);
    }

    #[test]
    fn test_distribution_without_answers_is_zero() {
        let mut store = Snapshot::new();
        let q = store.add_question("Hallo?", None, None, true).unwrap();
        store.add_possible_answer(q, "Was!", AnswerValue::Agree).unwrap();
        store.add_possible_answer(q, "Ich verstehe die Frage nicht.", AnswerValue::Neutral).unwrap();

        let answers = answer_distribution(&store, q).unwrap();
        let acceptable = acceptable_distribution(&store, q).unwrap();
        assert_eq!(answers.len(), 2);
        assert!(answers.iter().all(|s| s.percent == 0));
        assert!(acceptable.iter().all(|s| s.percent == 0));
    }

    #[test]
    fn test_distribution_counts_choices_and_acceptance() {
        let mut store = Snapshot::new();
        let q = store.add_question("Coffee or tea?", None, None, true).unwrap();
        let coffee = store.add_possible_answer(q, "Coffee", AnswerValue::Agree).unwrap();
        let tea = store.add_possible_answer(q, "Tea", AnswerValue::Disagree).unwrap();
        let p1 = store.add_profile(uuid::Uuid::new_v4(), Gender::Female);
        let p2 = store.add_profile(uuid::Uuid::new_v4(), Gender::Male);
        let p3 = store.add_profile(uuid::Uuid::new_v4(), Gender::Male);
        answer(&mut store, q, p1, coffee, &[coffee, tea]);
        answer(&mut store, q, p2, coffee, &[coffee]);
        answer(&mut store, q, p3, tea, &[tea]);

        let answers = answer_distribution(&store, q).unwrap();
        assert_eq!(answers[0].percent, 66);
        assert_eq!(answers[1].percent, 33);

        let acceptable = acceptable_distribution(&store, q).unwrap();
        assert_eq!(acceptable[0].percent, 66);
        assert_eq!(acceptable[1].percent, 66);
    }

    #[test]
    fn test_gender_split_rejects_empty_set() {
        let profiles: Vec<Profile> = vec![];
        assert_eq!(gender_split(&profiles), Err(MatchError::EmptyProfileSet));
    }

    #[test]
    fn test_answer_quote_by_gender() {
        let mut store = Snapshot::new();
        let q = store.add_question("Hallo?", None, None, true).unwrap();
        let yes = store.add_possible_answer(q, "yes", AnswerValue::Agree).unwrap();
        assert_eq!(answer_quote(&store, q, Gender::Male).unwrap(), 0.0);

        let f = store.add_profile(uuid::Uuid::new_v4(), Gender::Female);
        let m1 = store.add_profile(uuid::Uuid::new_v4(), Gender::Male);
        let m2 = store.add_profile(uuid::Uuid::new_v4(), Gender::Male);
        let u = store.add_profile(uuid::Uuid::new_v4(), Gender::Undefined);
        for p in [f, m1, m2, u] {
            answer(&mut store, q, p, yes, &[]);
        }

        assert_eq!(answer_quote(&store, q, Gender::Male).unwrap(), 0.5);
        assert_eq!(answer_quote(&store, q, Gender::Female).unwrap(), 0.25);
    }

    #[test]
    fn test_acceptance_quote() {
        let mut store = Snapshot::new();
        let q = store.add_question("Cats?", None, None, true).unwrap();
        let yes = store.add_possible_answer(q, "yes", AnswerValue::Agree).unwrap();
        let no = store.add_possible_answer(q, "no", AnswerValue::Disagree).unwrap();
        let me = store.add_profile(uuid::Uuid::new_v4(), Gender::Female);
        let m1 = store.add_profile(uuid::Uuid::new_v4(), Gender::Male);
        let m2 = store.add_profile(uuid::Uuid::new_v4(), Gender::Male);
        let f1 = store.add_profile(uuid::Uuid::new_v4(), Gender::Female);

        assert!(acceptance_quote(&store, q, me, Gender::Male).is_err());

        answer(&mut store, q, me, yes, &[yes]);
        assert_eq!(acceptance_quote(&store, q, me, Gender::Male).unwrap(), 0.0);

        answer(&mut store, q, m1, no, &[yes, no]);
        answer(&mut store, q, m2, no, &[no]);
        answer(&mut store, q, f1, yes, &[yes]);

        assert_eq!(acceptance_quote(&store, q, me, Gender::Male).unwrap(), 0.5);
        assert_eq!(acceptance_quote(&store, q, me, Gender::Female).unwrap(), 1.0);
    }

    #[test]
    fn test_question_stats() {
        let mut store = Snapshot::new();
        let q = store.add_question("Hallo?", None, None, true).unwrap();
        let yes = store.add_possible_answer(q, "yes", AnswerValue::Agree).unwrap();
        store.add_possible_answer(q, "no", AnswerValue::Disagree).unwrap();

        let empty = question_stats(&store, q).unwrap();
        assert_eq!(empty.all_answer_count, 0);
        assert_eq!(empty.last_answer, None);
        assert_eq!(empty.male_quote, 0.0);

        let m = store.add_profile(uuid::Uuid::new_v4(), Gender::Male);
        answer(&mut store, q, m, yes, &[yes]);
        let stats = question_stats(&store, q).unwrap();
        assert_eq!(stats.possible_answer_count, 2);
        assert_eq!(stats.male_answer_count, 1);
        assert_eq!(stats.male_quote, 1.0);
        assert_eq!(stats.answer_distribution[0].percent, 100);
        assert!(stats.last_answer.is_some());
    }

    #[test]
    fn test_unknown_question_is_not_found() {
        let store = Snapshot::new();
        assert_eq!(answer_distribution(&store, 7), Err(MatchError::not_found("question", 7)));
    }
}
