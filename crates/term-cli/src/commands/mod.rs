pub mod dispatch;
pub mod export;
pub mod glossary;
pub mod import;
pub mod init;
pub mod shared;
pub mod vocab;
