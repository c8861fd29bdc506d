pub mod timing;

pub use timing::StageTimer;
