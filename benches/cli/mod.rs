pub mod dispatch;
pub mod parser;
