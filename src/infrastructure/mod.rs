pub mod audio;
pub mod export;
pub mod observability;
pub mod storage;
