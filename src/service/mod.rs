pub mod checkout_service;
pub mod feed_parser;
pub mod message_composer;
pub mod relay_service;
