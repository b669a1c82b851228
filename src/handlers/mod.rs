pub mod pages;
pub mod wallet;
