pub mod decision;
pub mod inbound;
pub mod reservation;
