pub mod delivery;
pub mod email_log;
pub mod equipment;
pub mod notification;
pub mod professional;
pub mod project;
pub mod quotation;
pub mod supplier;
pub mod team_member;
pub mod user;
