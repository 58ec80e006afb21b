pub mod board;
pub mod keyboard;
pub mod ledger;
pub mod shop;
