use chrono::NaiveDate;

use crate::models::{Gender, Profile};

/// Profiles born strictly between `start` and `end`
///
/// The bounds are swapped when `start` is after `end`. Profiles without a
/// date of birth never match.
pub fn age_range<'a, I>(profiles: I, start: NaiveDate, end: NaiveDate) -> Vec<&'a Profile>
where
    I: IntoIterator<Item = &'a Profile>,
{
    let (start, end) = if start > end { (end, start) } else { (start, end) };
    profiles
        .into_iter()
        .filter(|p| p.dob.map_or(false, |dob| dob > start && dob < end))
        .collect()
}

/// Profiles born after `after` and before `before`, either bound optional
pub fn born_between<'a, I>(profiles: I, after: Option<NaiveDate>, before: Option<NaiveDate>) -> Vec<&'a Profile>
where
    I: IntoIterator<Item = &'a Profile>,
{
    age_range(
        profiles,
        after.unwrap_or(NaiveDate::MIN),
        before.unwrap_or(NaiveDate::MAX),
    )
}

pub fn with_gender<'a, I>(profiles: I, gender: Gender) -> Vec<&'a Profile>
where
    I: IntoIterator<Item = &'a Profile>,
{
    profiles.into_iter().filter(|p| p.gender == gender).collect()
}
