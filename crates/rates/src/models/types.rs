/// Currency code (ISO 4217 or crypto ticker)
pub type Currency = String;
