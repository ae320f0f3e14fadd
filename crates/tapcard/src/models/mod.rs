pub mod link;
pub mod nfc_tag;
pub mod profile;
pub mod user;
