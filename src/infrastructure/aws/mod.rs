pub mod attributes;
pub mod dynamodb_scan_adapter;
pub mod s3_blob_adapter;
pub mod sts_role_adapter;
