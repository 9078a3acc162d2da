pub mod mail;
pub mod partnership;
pub mod payment;
pub mod users;
pub mod validation;
