use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use crate::core::answers::validate_submission;
use crate::core::error::MatchError;
use crate::core::slug::{slugify, unique_slug};
use crate::models::{
    Answer, AnswerId, AnswerSubmission, AnswerValue, Category, CategoryId, Gender, PossibleAnswer,
    PossibleAnswerId, Profile, ProfileId, Question, QuestionId,
};

/// Read access to questions, profiles and answers
///
/// The aggregation and comparison functions only ever read through this
/// trait. Listing methods return rows ordered by id.
pub trait AnswerStore {
    fn question(&self, id: QuestionId) -> Option<&Question>;

    fn questions(&self) -> Vec<&Question>;

    fn profile(&self, id: ProfileId) -> Option<&Profile>;

    fn profiles(&self) -> Vec<&Profile>;

    fn possible_answers(&self, question_id: QuestionId) -> Vec<&PossibleAnswer>;

    fn get_answer(&self, question_id: QuestionId, profile_id: ProfileId) -> Option<&Answer>;

    fn list_answers(&self, question_id: QuestionId) -> Vec<&Answer>;

    fn list_answers_by_profile(&self, profile_id: ProfileId) -> Vec<&Answer>;

    /// Number of profiles with the given gender, all profiles for `None`
    fn count_profiles(&self, gender: Option<Gender>) -> usize {
        self.profiles()
            .into_iter()
            .filter(|p| gender.map_or(true, |g| p.gender == g))
            .count()
    }

    fn require_question(&self, id: QuestionId) -> Result<&Question, MatchError> {
        self.question(id).ok_or_else(|| MatchError::not_found("question", id))
    }

    fn require_profile(&self, id: ProfileId) -> Result<&Profile, MatchError> {
        self.profile(id).ok_or_else(|| MatchError::not_found("profile", id))
    }
}

/// In-memory materialization of the store
///
/// Request handlers load the rows they need from Postgres into a snapshot
/// and hand it to the pure core. The write methods enforce the same
/// constraints as the database schema.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    categories: BTreeMap<CategoryId, Category>,
    questions: BTreeMap<QuestionId, Question>,
    possible_answers: BTreeMap<PossibleAnswerId, PossibleAnswer>,
    profiles: BTreeMap<ProfileId, Profile>,
    answers: BTreeMap<AnswerId, Answer>,
    answer_index: HashMap<(QuestionId, ProfileId), AnswerId>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_category(&mut self, category: Category) {
        self.categories.insert(category.id, category);
    }

    pub fn put_question(&mut self, question: Question) {
        self.questions.insert(question.id, question);
    }

    pub fn put_possible_answer(&mut self, possible_answer: PossibleAnswer) {
        self.possible_answers.insert(possible_answer.id, possible_answer);
    }

    pub fn put_profile(&mut self, profile: Profile) {
        self.profiles.insert(profile.id, profile);
    }

    /// Load an existing answer row
    ///
    /// Fails with `DuplicateAnswer` if a different answer already exists for
    /// the same question and profile.
    pub fn put_answer(&mut self, answer: Answer) -> Result<(), MatchError> {
        let key = (answer.question_id, answer.profile_id);
        if let Some(existing) = self.answer_index.get(&key) {
            if *existing != answer.id {
                return Err(MatchError::DuplicateAnswer {
                    question_id: answer.question_id,
                    profile_id: answer.profile_id,
                });
            }
        }
        self.answer_index.insert(key, answer.id);
        self.answers.insert(answer.id, answer);
        Ok(())
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    pub fn categories(&self) -> Vec<&Category> {
        self.categories.values().collect()
    }

    pub fn answer(&self, id: AnswerId) -> Option<&Answer> {
        self.answers.get(&id)
    }

    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    pub fn add_category(&mut self, title: &str) -> CategoryId {
        let id = next_id(&self.categories);
        self.put_category(Category {
            id,
            title: title.to_string(),
        });
        id
    }

    /// Create a question with a unique slug derived from its text
    pub fn add_question(
        &mut self,
        text: &str,
        category_id: Option<CategoryId>,
        submitted_by: Option<ProfileId>,
        is_active: bool,
    ) -> Result<QuestionId, MatchError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MatchError::InvalidInput("question text is empty".to_string()));
        }
        if let Some(category_id) = category_id {
            if !self.categories.contains_key(&category_id) {
                return Err(MatchError::not_found("category", category_id));
            }
        }

        let slug = unique_slug(&slugify(text), |candidate| {
            self.questions.values().any(|q| q.slug == candidate)
        });
        let id = next_id(&self.questions);
        self.put_question(Question {
            id,
            category_id,
            question: text.to_string(),
            submitted_by,
            is_active,
            slug,
        });
        Ok(id)
    }

    pub fn add_possible_answer(
        &mut self,
        question_id: QuestionId,
        answer: &str,
        value: AnswerValue,
    ) -> Result<PossibleAnswerId, MatchError> {
        self.require_question(question_id)?;
        let id = next_id(&self.possible_answers);
        self.put_possible_answer(PossibleAnswer {
            id,
            question_id,
            answer: answer.to_string(),
            value,
        });
        Ok(id)
    }

    pub fn add_profile(&mut self, user_id: uuid::Uuid, gender: Gender) -> ProfileId {
        let id = next_id(&self.profiles);
        self.put_profile(Profile {
            id,
            user_id,
            is_public: false,
            gender,
            lookfor: Default::default(),
            dob: None,
        });
        id
    }

    /// Insert or update the single answer of a profile to a question
    ///
    /// Returns the answer id and whether a new row was created.
    pub fn upsert_answer(
        &mut self,
        submission: AnswerSubmission,
        when: DateTime<Utc>,
    ) -> Result<(AnswerId, bool), MatchError> {
        self.require_question(submission.question_id)?;
        self.require_profile(submission.profile_id)?;
        let options: Vec<PossibleAnswer> = self
            .possible_answers(submission.question_id)
            .into_iter()
            .cloned()
            .collect();
        validate_submission(&options, &submission)?;

        let key = (submission.question_id, submission.profile_id);
        let (id, created) = match self.answer_index.get(&key) {
            Some(id) => (*id, false),
            None => (next_id(&self.answers), true),
        };

        self.put_answer(Answer {
            id,
            question_id: submission.question_id,
            profile_id: submission.profile_id,
            when,
            user_answer: submission.user_answer,
            acceptable_answers: submission.acceptable_answers,
            importance: submission.importance,
            is_public: submission.is_public,
            description: submission.description,
        })?;
        Ok((id, created))
    }
}

fn next_id<V>(map: &BTreeMap<i64, V>) -> i64 {
    map.keys().next_back().map_or(1, |last| last + 1)
}

impl AnswerStore for Snapshot {
    fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.get(&id)
    }

    fn questions(&self) -> Vec<&Question> {
        self.questions.values().collect()
    }

    fn profile(&self, id: ProfileId) -> Option<&Profile> {
        self.profiles.get(&id)
    }

    fn profiles(&self) -> Vec<&Profile> {
        self.profiles.values().collect()
    }

    fn possible_answers(&self, question_id: QuestionId) -> Vec<&PossibleAnswer> {
        self.possible_answers
            .values()
            .filter(|pa| pa.question_id == question_id)
            .collect()
    }

    fn get_answer(&self, question_id: QuestionId, profile_id: ProfileId) -> Option<&Answer> {
        self.answer_index
            .get(&(question_id, profile_id))
            .and_then(|id| self.answers.get(id))
    }

    fn list_answers(&self, question_id: QuestionId) -> Vec<&Answer> {
        self.answers
            .values()
            .filter(|a| a.question_id == question_id)
            .collect()
    }

    fn list_answers_by_profile(&self, profile_id: ProfileId) -> Vec<&Answer> {
        self.answers
            .values()
            .filter(|a| a.profile_id == profile_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Importance;
    use std::collections::BTreeSet;

    fn submission(question_id: QuestionId, profile_id: ProfileId, choice: PossibleAnswerId) -> AnswerSubmission {
        AnswerSubmission {
            question_id,
            profile_id,
            user_answer: choice,
            acceptable_answers: BTreeSet::from([choice]),
            importance: Importance::default(),
            is_public: true,
            description: None,
        }
    }

    #[test]
    fn test_resubmission_updates_existing_answer() {
        let mut store = Snapshot::new();
        let q = store.add_question("Hallo?", None, None, true).unwrap();
        let yes = store.add_possible_answer(q, "Was!", AnswerValue::Agree).unwrap();
        let no = store.add_possible_answer(q, "Nein", AnswerValue::Disagree).unwrap();
        let p = store.add_profile(uuid::Uuid::new_v4(), Gender::Female);

        let (first, created) = store.upsert_answer(submission(q, p, yes), Utc::now()).unwrap();
        assert!(created);
        let (second, created) = store.upsert_answer(submission(q, p, no), Utc::now()).unwrap();
        assert!(!created);

        assert_eq!(first, second);
        assert_eq!(store.list_answers(q).len(), 1);
        assert_eq!(store.get_answer(q, p).unwrap().user_answer, no);
    }

    #[test]
    fn test_put_answer_rejects_second_row_for_pair() {
        let mut store = Snapshot::new();
        let q = store.add_question("Hallo?", None, None, true).unwrap();
        let yes = store.add_possible_answer(q, "Was!", AnswerValue::Agree).unwrap();
        let p = store.add_profile(uuid::Uuid::new_v4(), Gender::Male);
        let (id, _) = store.upsert_answer(submission(q, p, yes), Utc::now()).unwrap();

        let mut duplicate = store.answer(id).unwrap().clone();
        duplicate.id = id + 100;
        let err = store.put_answer(duplicate).unwrap_err();
        assert!(matches!(err, MatchError::DuplicateAnswer { .. }));
    }

    #[test]
    fn test_upsert_requires_known_question_and_profile() {
        let mut store = Snapshot::new();
        let p = store.add_profile(uuid::Uuid::new_v4(), Gender::Male);
        let err = store.upsert_answer(submission(42, p, 1), Utc::now()).unwrap_err();
        assert_eq!(err, MatchError::not_found("question", 42));
    }

    #[test]
    fn test_duplicate_question_text_gets_distinct_slug() {
        let mut store = Snapshot::new();
        let a = store.add_question("Hallo?", None, None, true).unwrap();
        let b = store.add_question("Hallo!", None, None, true).unwrap();
        assert_eq!(store.question(a).unwrap().slug, "hallo");
        assert_eq!(store.question(b).unwrap().slug, "hallo-2");
    }

    #[test]
    fn test_count_profiles_by_gender() {
        let mut store = Snapshot::new();
        store.add_profile(uuid::Uuid::new_v4(), Gender::Female);
        store.add_profile(uuid::Uuid::new_v4(), Gender::Male);
        store.add_profile(uuid::Uuid::new_v4(), Gender::Male);

        assert_eq!(store.count_profiles(None), 3);
        assert_eq!(store.count_profiles(Some(Gender::Male)), 2);
        assert_eq!(store.count_profiles(Some(Gender::Undefined)), 0);
    }
}
