use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::core::MatchError;

pub type CategoryId = i64;
pub type QuestionId = i64;
pub type PossibleAnswerId = i64;
pub type ProfileId = i64;
pub type AnswerId = i64;

/// Gender stored on a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    #[serde(alias = "U")]
    Undefined,
    #[serde(alias = "M")]
    Male,
    #[serde(alias = "F")]
    Female,
}

impl Gender {
    /// Single character code used in the database
    pub fn code(self) -> &'static str {
        match self {
            Gender::Undefined => "U",
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }

    /// Unknown codes read back as `Undefined`
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Gender::Male,
            "F" | "FEMALE" => Gender::Female,
            _ => Gender::Undefined,
        }
    }
}

/// Which gender a profile is looking for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookFor {
    #[default]
    #[serde(alias = "U")]
    Undefined,
    #[serde(alias = "M")]
    Male,
    #[serde(alias = "F")]
    Female,
    #[serde(alias = "B")]
    Both,
}

impl LookFor {
    pub fn code(self) -> &'static str {
        match self {
            LookFor::Undefined => "U",
            LookFor::Male => "M",
            LookFor::Female => "F",
            LookFor::Both => "B",
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => LookFor::Male,
            "F" | "FEMALE" => LookFor::Female,
            "B" | "BOTH" => LookFor::Both,
            _ => LookFor::Undefined,
        }
    }
}

/// Ordinal value of a possible answer on the five point scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum AnswerValue {
    StronglyDisagree,
    Disagree,
    #[default]
    Neutral,
    Agree,
    StronglyAgree,
}

impl AnswerValue {
    /// Position on the -1.0 ..= 1.0 scale
    pub fn as_f64(self) -> f64 {
        match self {
            AnswerValue::StronglyDisagree => -1.0,
            AnswerValue::Disagree => -0.5,
            AnswerValue::Neutral => 0.0,
            AnswerValue::Agree => 0.5,
            AnswerValue::StronglyAgree => 1.0,
        }
    }
}

impl TryFrom<i16> for AnswerValue {
    type Error = MatchError;

    fn try_from(level: i16) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(AnswerValue::StronglyDisagree),
            1 => Ok(AnswerValue::Disagree),
            2 => Ok(AnswerValue::Neutral),
            3 => Ok(AnswerValue::Agree),
            4 => Ok(AnswerValue::StronglyAgree),
            other => Err(MatchError::InvalidLevel {
                kind: "answer value",
                level: other,
            }),
        }
    }
}

impl From<AnswerValue> for i16 {
    fn from(value: AnswerValue) -> Self {
        value as i16
    }
}

/// How much an answer matters to the profile that gave it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum Importance {
    Irrelevant,
    Little,
    #[default]
    Somewhat,
    Very,
    Mandatory,
}

impl TryFrom<i16> for Importance {
    type Error = MatchError;

    fn try_from(level: i16) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Importance::Irrelevant),
            1 => Ok(Importance::Little),
            2 => Ok(Importance::Somewhat),
            3 => Ok(Importance::Very),
            4 => Ok(Importance::Mandatory),
            other => Err(MatchError::InvalidLevel {
                kind: "importance",
                level: other,
            }),
        }
    }
}

impl From<Importance> for i16 {
    fn from(importance: Importance) -> Self {
        importance as i16
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A multiple choice prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub category_id: Option<CategoryId>,
    pub question: String,
    pub submitted_by: Option<ProfileId>,
    pub is_active: bool,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossibleAnswer {
    pub id: PossibleAnswerId,
    pub question_id: QuestionId,
    pub answer: String,
    #[serde(default)]
    pub value: AnswerValue,
}

/// Matchmaking attributes of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: uuid::Uuid,
    pub is_public: bool,
    pub gender: Gender,
    pub lookfor: LookFor,
    pub dob: Option<NaiveDate>,
}

impl Profile {
    /// Age in whole years at `today`, `None` without a date of birth
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let dob = self.dob?;
        let mut years = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    pub fn age(&self) -> Option<u32> {
        self.age_on(Utc::now().date_naive())
    }
}

/// One profile's response to one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub profile_id: ProfileId,
    pub when: DateTime<Utc>,
    pub user_answer: PossibleAnswerId,
    pub acceptable_answers: BTreeSet<PossibleAnswerId>,
    pub importance: Importance,
    pub is_public: bool,
    pub description: Option<String>,
}

impl Answer {
    pub fn accepts(&self, possible_answer: PossibleAnswerId) -> bool {
        self.acceptable_answers.contains(&possible_answer)
    }
}

/// Input to the answer upsert path
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub profile_id: ProfileId,
    pub user_answer: PossibleAnswerId,
    pub acceptable_answers: BTreeSet<PossibleAnswerId>,
    pub importance: Importance,
    pub is_public: bool,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_born(dob: Option<NaiveDate>) -> Profile {
        Profile {
            id: 1,
            user_id: uuid::Uuid::nil(),
            is_public: true,
            gender: Gender::Female,
            lookfor: LookFor::Male,
            dob,
        }
    }

    #[test]
    fn test_age_before_and_after_birthday() {
        let profile = profile_born(NaiveDate::from_ymd_opt(1990, 6, 15));
        let before = NaiveDate::from_ymd_opt(2020, 6, 14).unwrap();
        let on = NaiveDate::from_ymd_opt(2020, 6, 15).unwrap();

        assert_eq!(profile.age_on(before), Some(29));
        assert_eq!(profile.age_on(on), Some(30));
    }

    #[test]
    fn test_age_undefined_without_dob() {
        let profile = profile_born(None);
        assert_eq!(profile.age_on(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()), None);
    }

    #[test]
    fn test_answer_value_levels() {
        assert_eq!(AnswerValue::try_from(0i16).unwrap().as_f64(), -1.0);
        assert_eq!(AnswerValue::try_from(4i16).unwrap().as_f64(), 1.0);
        assert!(AnswerValue::try_from(5i16).is_err());
        assert_eq!(AnswerValue::default(), AnswerValue::Neutral);
    }

    #[test]
    fn test_gender_codes() {
        assert_eq!(Gender::from_code("m"), Gender::Male);
        assert_eq!(Gender::from_code(Gender::Female.code()), Gender::Female);
        assert_eq!(Gender::from_code("x"), Gender::Undefined);
        let parsed: Gender = serde_json::from_str("\"F\"").unwrap();
        assert_eq!(parsed, Gender::Female);
    }
}
