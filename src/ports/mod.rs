pub mod artifact_sink;
pub mod blob_port;
pub mod clock;
pub mod credential_port;
pub mod scan_port;
