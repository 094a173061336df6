pub mod account;
pub mod add;
#[cfg(feature = "audit-log")]
pub mod audit_cmd;
pub mod completions;
pub mod edit;
pub mod export;
pub mod generate;
pub mod import_cmd;
pub mod list;
pub mod remove;
pub mod show;
