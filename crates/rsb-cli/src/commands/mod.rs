pub mod build;
pub mod evaluate;
pub mod generate;
pub mod mix;
pub mod recover;
pub mod run;
