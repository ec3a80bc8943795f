// Core questionnaire logic: pure functions over an answer store
pub mod aggregator;
pub mod answers;
pub mod comparator;
pub mod error;
pub mod profiles;
pub mod slug;
pub mod store;

pub use aggregator::{
    acceptable_distribution, acceptance_quote, answer_distribution, answer_quote, gender_split, percent,
    question_stats, quote,
};
pub use answers::{agreement_rate, answered, has_answer, last_answer, public_answers, unanswered, validate_submission};
pub use comparator::{agrees, compare, mutually_acceptable};
pub use error::MatchError;
pub use profiles::{age_range, born_between, with_gender};
pub use slug::{slugify, unique_slug};
pub use store::{AnswerStore, Snapshot};
