pub mod credentials;
pub mod export_writer;
pub mod orchestrator;
pub mod runtime;
pub mod scanner;
pub mod uploader;
