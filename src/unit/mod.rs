mod name;
mod table;

pub use name::{NameConvention, NameNormalizer};
pub use table::{FixedUnit, Unit, UnitRecord, UnitTable};
