//! SeaORM entity definitions

pub mod decoded_vins;
pub mod prelude;
