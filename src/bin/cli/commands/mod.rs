pub mod add;
pub mod history;
pub mod review;
pub mod stats;
