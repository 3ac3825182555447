pub mod feed_client;
pub mod sms_client;
