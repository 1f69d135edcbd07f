pub mod blocks;
pub mod calls;
pub mod logs;
pub mod transactions;
