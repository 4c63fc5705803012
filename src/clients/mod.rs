pub mod assertion;
pub mod fcm;
pub mod health;
pub mod oauth;
pub mod recipients;
