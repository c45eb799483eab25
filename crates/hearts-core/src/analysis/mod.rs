pub mod possibility;
