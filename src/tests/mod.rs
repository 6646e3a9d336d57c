pub mod index_tests;
pub mod pending_tests;
pub mod timeline_tests;
