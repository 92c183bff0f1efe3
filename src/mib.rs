//! Objects of the standard UPS-MIB (RFC 1628) this check reads.

/// upsIdentManufacturer
pub const UPS_IDENT_MANUFACTURER: &str = "1.3.6.1.2.1.33.1.1.1";

/// upsIdentModel
pub const UPS_IDENT_MODEL: &str = "1.3.6.1.2.1.33.1.1.2";

/// upsOutputPercentLoad, first output line
pub const UPS_OUTPUT_PERCENT_LOAD: &str = "1.3.6.1.2.1.33.1.4.4.1.5";

/// upsEstimatedMinutesRemaining
pub const UPS_ESTIMATED_MINUTES_REMAINING: &str = "1.3.6.1.2.1.33.1.2.3";
