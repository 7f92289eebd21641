pub mod keywords;
pub mod wordlist;
