// Unit tests for match-questions

use chrono::NaiveDate;
use match_questions::core::{age_range, born_between, gender_split, percent, quote, slugify, unique_slug, with_gender};
use match_questions::models::{
    AnswerQuestionRequest, AnswerValue, Gender, Importance, LookFor, Profile, ProfileResponse, ProfileStatsQuery,
    SubmitQuestionRequest,
};
use validator::Validate;

fn profile(id: i64, gender: Gender, dob: Option<NaiveDate>) -> Profile {
    Profile {
        id,
        user_id: uuid::Uuid::new_v4(),
        is_public: true,
        gender,
        lookfor: LookFor::Both,
        dob,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_percent_and_quote_with_zero_total() {
    assert_eq!(percent(0, 0), 0);
    assert_eq!(percent(5, 0), 0);
    assert_eq!(quote(3, 0), 0.0);
}

#[test]
fn test_percent_truncates_towards_zero() {
    assert_eq!(percent(1, 3), 33);
    assert_eq!(percent(2, 3), 66);
    assert_eq!(percent(99, 99), 100);
    assert_eq!(percent(50, 99), 50);
}

#[test]
fn test_slugify_examples() {
    assert_eq!(slugify("Hallo?"), "hallo");
    assert_eq!(slugify("  Do you   like cats?  "), "do-you-like-cats");
    assert_eq!(slugify("Magst du Käse & Brötchen?"), "magst-du-kase-brotchen");
    assert_eq!(slugify("???"), "question");
}

#[test]
fn test_slugify_respects_column_length() {
    let long = "word ".repeat(200);
    let slug = slugify(&long);
    assert!(slug.len() <= 255);
    assert!(!slug.ends_with('-'));
}

#[test]
fn test_unique_slug_suffixes() {
    let taken = ["hallo", "hallo-2"];
    assert_eq!(unique_slug("hallo", |s| taken.contains(&s)), "hallo-3");
    assert_eq!(unique_slug("servus", |s| taken.contains(&s)), "servus");
}

#[test]
fn test_answer_value_scale() {
    let levels: Vec<f64> = (0i16..5)
        .map(|level| AnswerValue::try_from(level).unwrap().as_f64())
        .collect();
    assert_eq!(levels, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    assert!(AnswerValue::try_from(5i16).is_err());
    assert!(Importance::try_from(-1i16).is_err());
}

#[test]
fn test_gender_codes_round_trip() {
    for gender in [Gender::Undefined, Gender::Male, Gender::Female] {
        assert_eq!(Gender::from_code(gender.code()), gender);
    }
    assert_eq!(Gender::from_code("x"), Gender::Undefined);
    assert_eq!(LookFor::from_code("B"), LookFor::Both);
}

#[test]
fn test_age_range_and_gender_filters() {
    let profiles = vec![
        profile(1, Gender::Female, Some(date(1990, 6, 1))),
        profile(2, Gender::Male, Some(date(1975, 1, 1))),
        profile(3, Gender::Female, Some(date(1988, 12, 31))),
        profile(4, Gender::Female, None),
    ];

    let eighties_nineties = age_range(&profiles, date(1995, 1, 1), date(1985, 1, 1));
    let ids: Vec<i64> = eighties_nineties.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3]);

    assert_eq!(with_gender(&profiles, Gender::Female).len(), 3);
}

#[test]
fn test_profile_age() {
    let p = profile(1, Gender::Male, Some(date(1990, 6, 15)));
    assert_eq!(p.age_on(date(2020, 6, 14)), Some(29));
    assert_eq!(p.age_on(date(2020, 6, 15)), Some(30));
    assert_eq!(profile(2, Gender::Male, None).age_on(date(2020, 1, 1)), None);
}

#[test]
fn test_profile_response_carries_age() {
    let p = profile(7, Gender::Female, Some(date(1990, 6, 15)));
    let expected = p.age().unwrap();

    let json = serde_json::to_value(ProfileResponse::from(p)).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["age"], expected);

    let json = serde_json::to_value(ProfileResponse::from(profile(8, Gender::Male, None))).unwrap();
    assert!(json["age"].is_null());
}

#[test]
fn test_gender_split_within_birth_range() {
    let profiles = vec![
        profile(1, Gender::Female, Some(date(1990, 6, 1))),
        profile(2, Gender::Male, Some(date(1975, 1, 1))),
        profile(3, Gender::Male, Some(date(1988, 12, 31))),
        profile(4, Gender::Female, None),
    ];

    let query: ProfileStatsQuery = serde_json::from_str(r#"{"bornAfter": "1980-01-01"}"#).unwrap();
    assert!(query.born_before.is_none());

    let born = born_between(&profiles, query.born_after, query.born_before);
    let split = gender_split(born.iter().copied()).unwrap();
    assert_eq!((split.female_count, split.male_count), (1, 1));
    assert!((split.female_fraction - 0.5).abs() < 1e-12);

    let nobody = born_between(&profiles, Some(date(2010, 1, 1)), None);
    assert!(gender_split(nobody.iter().copied()).is_err());
}

#[test]
fn test_answer_request_defaults() {
    let req: AnswerQuestionRequest = serde_json::from_str(r#"{"userAnswer": 7}"#).unwrap();
    assert_eq!(req.user_answer, 7);
    assert!(req.acceptable_answers.is_empty());
    assert_eq!(req.importance, Importance::Somewhat);
    assert!(req.is_public);
    assert!(req.validate().is_ok());
}

#[test]
fn test_answer_request_rejects_unknown_importance() {
    let parsed = serde_json::from_str::<AnswerQuestionRequest>(r#"{"userAnswer": 7, "importance": 9}"#);
    assert!(parsed.is_err());
}

#[test]
fn test_submit_question_validation() {
    let empty = SubmitQuestionRequest {
        question: String::new(),
        category_id: None,
    };
    assert!(empty.validate().is_err());

    let ok: SubmitQuestionRequest =
        serde_json::from_str(r#"{"question": "Hallo?", "categoryId": 1}"#).unwrap();
    assert_eq!(ok.category_id, Some(1));
    assert!(ok.validate().is_ok());
}
