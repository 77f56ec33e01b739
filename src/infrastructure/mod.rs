pub mod gemini_client;
pub mod json_file_store;
pub mod memory_store;
