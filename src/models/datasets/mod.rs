pub mod blocks;
pub mod calls;
pub mod logs;
pub mod traces;
pub mod transactions;
