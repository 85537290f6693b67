//! Provider-neutral data contracts shared by every evaluator, the aggregator,
//! and the adapters that feed them.

mod candidate;
mod evaluation;
mod job;

pub use candidate::{
    CandidateConstraints, CandidateProfile, ContactInfo, EducationEntry, ExperienceEntry,
    LanguageProficiency, SkillAggregate,
};
pub use evaluation::{AggregateScores, Decision, DecisionSummary, EvaluationResult, ScreeningOutcome};
pub use job::{JobConstraints, JobDescription, SalaryRange};
