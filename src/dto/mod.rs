pub mod application_dto;
pub mod candidate_dto;
pub mod interview_dto;
pub mod job_dto;
pub mod response_dto;
pub mod upload_dto;
pub mod user_dto;
