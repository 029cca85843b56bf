pub mod model;
pub mod plot;
pub mod table;
