pub mod run;
pub mod score;
