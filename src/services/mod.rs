pub mod application_service;
pub mod chat_service;
pub mod memory_storage;
pub mod pg_storage;
pub mod storage;
pub mod upload_service;
pub mod user_service;
