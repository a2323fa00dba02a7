pub mod placement;
pub mod user;

pub use placement::{
    Applicant, ApplicantStatus, InterviewDetails, InterviewMode, JobType, Placement,
    PlacementRecord, PlacementStatus,
};
pub use user::{Profile, Role, Session, User};
