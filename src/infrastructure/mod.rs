pub mod aws;
pub mod local_storage;
