pub mod cookie;
pub mod key_share;
pub mod supported_groups;
pub mod supported_versions;
