pub mod fcm;
pub mod health;
pub mod oauth;
pub mod request;
pub mod response;
