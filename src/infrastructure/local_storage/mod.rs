pub mod local_artifact;
